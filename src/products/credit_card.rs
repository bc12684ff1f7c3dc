//! Credit card payoff planner

use serde::{Deserialize, Serialize};

use super::run_to_payoff;
use crate::error::{require_non_negative, require_positive, CalcResult};
use crate::formula::monthly_payment;
use crate::schedule::{
    LoanTerms, PaymentPolicy, RateOverride, ScheduleResult, ScheduleSimulator, ScheduleSummary,
};

/// How the card is paid down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayoffStrategy {
    /// Pay the same amount every month until the balance is cleared
    FixedPayment { amount: f64 },
    /// Pay whatever clears the balance in the given number of months
    TargetMonths { months: u32 },
}

impl Default for PayoffStrategy {
    fn default() -> Self {
        PayoffStrategy::TargetMonths { months: 24 }
    }
}

/// Introductory rate on the balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub annual_rate_percent: f64,
    pub months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditCardInput {
    pub balance: f64,
    pub annual_rate_percent: f64,
    pub strategy: PayoffStrategy,
    pub promotion: Option<Promotion>,
}

impl Default for CreditCardInput {
    fn default() -> Self {
        Self {
            balance: 0.0,
            annual_rate_percent: 22.9,
            strategy: PayoffStrategy::default(),
            promotion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardOutput {
    pub monthly_payment: f64,
    pub months_to_payoff: u32,
    pub total_interest: f64,
    pub total_paid: f64,
    pub summary: ScheduleSummary,
    pub schedule: ScheduleResult,
}

/// Plan the payoff of a card balance
pub fn calculate_card_payoff(input: &CreditCardInput) -> CalcResult<CreditCardOutput> {
    let balance = require_positive("balance", input.balance)?;
    let rate = require_non_negative("annual_rate_percent", input.annual_rate_percent)?;

    let payment = match input.strategy {
        PayoffStrategy::FixedPayment { amount } => require_positive("amount", amount)?,
        // Level payment at the card rate; a promotion only shortens the payoff
        PayoffStrategy::TargetMonths { months } => monthly_payment(balance, rate, months.max(1)),
    };
    let target_months = match input.strategy {
        PayoffStrategy::TargetMonths { months } => months.max(1),
        PayoffStrategy::FixedPayment { .. } => 1,
    };

    let rate_override = match input.promotion {
        Some(promo) => {
            require_non_negative("promotion.annual_rate_percent", promo.annual_rate_percent)?;
            Some(RateOverride::Promotional {
                annual_rate_percent: promo.annual_rate_percent,
                months: promo.months,
            })
        }
        None => None,
    };

    let sim = ScheduleSimulator::new(
        LoanTerms::new(balance, rate, target_months),
        PaymentPolicy {
            payment_override: Some(payment),
            rate_override,
            ..Default::default()
        },
    );
    let schedule = run_to_payoff(&sim)?;
    log::debug!(
        "card payoff: payment={:.2} months={} interest={:.2}",
        payment,
        schedule.months,
        schedule.total_interest
    );

    Ok(CreditCardOutput {
        monthly_payment: payment,
        months_to_payoff: schedule.months,
        total_interest: schedule.total_interest,
        total_paid: schedule.total_payment,
        summary: schedule.summary(),
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use approx::assert_relative_eq;

    #[test]
    fn test_target_months() {
        let out = calculate_card_payoff(&CreditCardInput {
            balance: 3_000.0,
            annual_rate_percent: 18.0,
            strategy: PayoffStrategy::TargetMonths { months: 12 },
            promotion: None,
        })
        .unwrap();

        assert_eq!(out.months_to_payoff, 12);
        let expected_payment = monthly_payment(3_000.0, 18.0, 12);
        assert_relative_eq!(out.monthly_payment, expected_payment, epsilon = 1e-9);
        assert!(out.schedule.is_paid_off());
    }

    #[test]
    fn test_fixed_payment() {
        let out = calculate_card_payoff(&CreditCardInput {
            balance: 2_000.0,
            annual_rate_percent: 24.0,
            strategy: PayoffStrategy::FixedPayment { amount: 100.0 },
            promotion: None,
        })
        .unwrap();

        assert!(out.months_to_payoff > 20);
        assert!(out.total_interest > 0.0);
        assert_relative_eq!(out.total_paid, 2_000.0 + out.total_interest, epsilon = 1e-6);
    }

    #[test]
    fn test_promotion_is_interest_free() {
        let out = calculate_card_payoff(&CreditCardInput {
            balance: 3_000.0,
            annual_rate_percent: 20.0,
            strategy: PayoffStrategy::FixedPayment { amount: 200.0 },
            promotion: Some(Promotion { annual_rate_percent: 0.0, months: 6 }),
        })
        .unwrap();

        assert!(out.schedule.entries[..6].iter().all(|e| e.interest == 0.0));
        assert!(out.schedule.entries[6].interest > 0.0);
    }

    #[test]
    fn test_payment_below_interest() {
        let out = calculate_card_payoff(&CreditCardInput {
            balance: 10_000.0,
            annual_rate_percent: 24.0,
            strategy: PayoffStrategy::FixedPayment { amount: 150.0 },
            promotion: None,
        });
        assert!(matches!(out, Err(CalcError::PaymentTooLow { .. })));
    }
}
