//! Borrowing-capacity solver

use serde::{Deserialize, Serialize};

use super::rate_sweep;
use crate::error::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::formula::{monthly_payment, principal_from_payment, MONTHS_PER_YEAR};

/// How the lender caps the loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BorrowingMethod {
    /// Max loan = annual income × multiple
    IncomeMultiple { multiple: f64 },
    /// Max payment = monthly income × cap% − outgoings
    PaymentCap { cap_percent: f64 },
}

impl Default for BorrowingMethod {
    fn default() -> Self {
        BorrowingMethod::IncomeMultiple { multiple: 4.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowingInput {
    pub annual_income: f64,
    /// Second applicant's income, if any
    pub partner_income: f64,
    /// Committed monthly spending deducted under the payment-cap method
    pub monthly_outgoings: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub deposit: f64,
    pub method: BorrowingMethod,
}

impl Default for BorrowingInput {
    fn default() -> Self {
        Self {
            annual_income: 0.0,
            partner_income: 0.0,
            monthly_outgoings: 0.0,
            annual_rate_percent: 5.0,
            term_months: 300,
            deposit: 0.0,
            method: BorrowingMethod::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorrowingSensitivityPoint {
    pub annual_rate_percent: f64,
    pub max_borrow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowingOutput {
    pub combined_income: f64,
    pub max_borrow: f64,
    /// Monthly payment of the maximum loan at the current rate
    pub max_monthly_payment: f64,
    pub max_property_price: f64,
    /// Max borrow at the same monthly payment across rates
    pub rate_sensitivity: Vec<BorrowingSensitivityPoint>,
}

/// Solve for the largest loan an applicant can take
pub fn solve_borrowing_capacity(input: &BorrowingInput) -> CalcResult<BorrowingOutput> {
    let income = require_positive("annual_income", input.annual_income)?
        + require_non_negative("partner_income", input.partner_income)?;
    let outgoings = require_non_negative("monthly_outgoings", input.monthly_outgoings)?;
    let rate = require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    let deposit = require_non_negative("deposit", input.deposit)?;
    let term = input.term_months.max(1);

    let (max_borrow, max_monthly_payment) = match input.method {
        BorrowingMethod::IncomeMultiple { multiple } => {
            let multiple = require_positive("multiple", multiple)?;
            let borrow = income * multiple;
            (borrow, monthly_payment(borrow, rate, term))
        }
        BorrowingMethod::PaymentCap { cap_percent } => {
            let cap = require_positive("cap_percent", cap_percent)?;
            let payment = income / MONTHS_PER_YEAR * cap / 100.0 - outgoings;
            if payment <= 0.0 {
                return Err(CalcError::NoAffordablePayment { payment });
            }
            (principal_from_payment(payment, rate, term), payment)
        }
    };

    let rate_sensitivity = rate_sweep(rate)
        .into_iter()
        .map(|r| BorrowingSensitivityPoint {
            annual_rate_percent: r,
            max_borrow: principal_from_payment(max_monthly_payment, r, term),
        })
        .collect();

    Ok(BorrowingOutput {
        combined_income: income,
        max_borrow,
        max_monthly_payment,
        max_property_price: max_borrow + deposit,
        rate_sensitivity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_income_multiple() {
        let out = solve_borrowing_capacity(&BorrowingInput {
            annual_income: 50_000.0,
            partner_income: 30_000.0,
            deposit: 40_000.0,
            ..Default::default()
        })
        .unwrap();

        assert_relative_eq!(out.max_borrow, 360_000.0);
        assert_relative_eq!(out.max_property_price, 400_000.0);
        assert_relative_eq!(out.max_monthly_payment, monthly_payment(360_000.0, 5.0, 300));
    }

    #[test]
    fn test_payment_cap() {
        let out = solve_borrowing_capacity(&BorrowingInput {
            annual_income: 60_000.0,
            monthly_outgoings: 500.0,
            annual_rate_percent: 6.0,
            term_months: 360,
            method: BorrowingMethod::PaymentCap { cap_percent: 35.0 },
            ..Default::default()
        })
        .unwrap();

        // 5000 * 35% - 500
        assert_relative_eq!(out.max_monthly_payment, 1_250.0, epsilon = 1e-9);
        assert_relative_eq!(monthly_payment(out.max_borrow, 6.0, 360), 1_250.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sensitivity_falls_with_rate() {
        let out = solve_borrowing_capacity(&BorrowingInput {
            annual_income: 50_000.0,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(out.rate_sensitivity.len(), 9);
        let borrows: Vec<f64> = out.rate_sensitivity.iter().map(|p| p.max_borrow).collect();
        assert!(borrows.windows(2).all(|w| w[1] < w[0]));
        let at_current_rate = out.rate_sensitivity[4].max_borrow;
        assert_relative_eq!(at_current_rate, out.max_borrow, max_relative = 1e-9);
    }

    #[test]
    fn test_outgoings_exceed_cap() {
        let out = solve_borrowing_capacity(&BorrowingInput {
            annual_income: 24_000.0,
            monthly_outgoings: 1_000.0,
            method: BorrowingMethod::PaymentCap { cap_percent: 30.0 },
            ..Default::default()
        });
        assert!(matches!(out, Err(CalcError::NoAffordablePayment { .. })));
    }

    #[test]
    fn test_requires_income() {
        assert_eq!(
            solve_borrowing_capacity(&BorrowingInput::default()),
            Err(CalcError::NonPositive { field: "annual_income" })
        );
    }
}
