//! Auto loan: sales tax, trade-in and dealer fees folded into the financed amount

use serde::{Deserialize, Serialize};

use super::run_to_payoff;
use crate::error::{require_non_negative, CalcError, CalcResult};
use crate::schedule::{LoanTerms, ScheduleResult, ScheduleSimulator, ScheduleSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoLoanInput {
    pub vehicle_price: f64,
    pub down_payment: f64,
    pub trade_in_value: f64,
    /// Outstanding finance on the trade-in, rolled into the new loan
    pub trade_in_owed: f64,
    pub sales_tax_percent: f64,
    pub fees: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
}

impl Default for AutoLoanInput {
    fn default() -> Self {
        Self {
            vehicle_price: 0.0,
            down_payment: 0.0,
            trade_in_value: 0.0,
            trade_in_owed: 0.0,
            sales_tax_percent: 0.0,
            fees: 0.0,
            annual_rate_percent: 6.5,
            term_months: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLoanOutput {
    pub sales_tax: f64,
    pub financed_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    /// Everything paid for the vehicle: loan payments plus the down payment
    pub total_cost: f64,
    pub summary: ScheduleSummary,
    pub schedule: ScheduleResult,
}

/// Sales tax is charged on the price net of the trade-in
fn sales_tax(input: &AutoLoanInput) -> f64 {
    (input.vehicle_price - input.trade_in_value).max(0.0) * input.sales_tax_percent / 100.0
}

/// Finance a vehicle purchase
pub fn calculate_auto_loan(input: &AutoLoanInput) -> CalcResult<AutoLoanOutput> {
    require_non_negative("vehicle_price", input.vehicle_price)?;
    let down = require_non_negative("down_payment", input.down_payment)?;
    require_non_negative("trade_in_value", input.trade_in_value)?;
    require_non_negative("trade_in_owed", input.trade_in_owed)?;
    require_non_negative("sales_tax_percent", input.sales_tax_percent)?;
    require_non_negative("fees", input.fees)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;

    let tax = sales_tax(input);
    let financed = input.vehicle_price + tax + input.fees - down - input.trade_in_value
        + input.trade_in_owed;
    if financed <= 0.0 {
        return Err(CalcError::NonPositive { field: "financed_amount" });
    }

    let terms = LoanTerms::new(financed, input.annual_rate_percent, input.term_months.max(1));
    let schedule = run_to_payoff(&ScheduleSimulator::for_terms(terms))?;

    Ok(AutoLoanOutput {
        sales_tax: tax,
        financed_amount: financed,
        monthly_payment: schedule.base_payment,
        total_interest: schedule.total_interest,
        total_cost: schedule.total_payment + down,
        summary: schedule.summary(),
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::monthly_payment;
    use approx::assert_relative_eq;

    fn input() -> AutoLoanInput {
        AutoLoanInput {
            vehicle_price: 30_000.0,
            down_payment: 3_000.0,
            trade_in_value: 5_000.0,
            trade_in_owed: 2_000.0,
            sales_tax_percent: 8.0,
            fees: 500.0,
            annual_rate_percent: 6.0,
            term_months: 60,
        }
    }

    #[test]
    fn test_financed_amount() {
        let out = calculate_auto_loan(&input()).unwrap();
        // tax on 25,000 net of trade-in
        assert_relative_eq!(out.sales_tax, 2_000.0, epsilon = 1e-9);
        // price + tax + fees - down - trade-in + owed
        let financed = 30_000.0 + 2_000.0 + 500.0 - 3_000.0 - 5_000.0 + 2_000.0;
        assert_relative_eq!(out.financed_amount, financed);
        let expected_payment = monthly_payment(26_500.0, 6.0, 60);
        assert_relative_eq!(out.monthly_payment, expected_payment, epsilon = 1e-9);
        assert_eq!(out.summary.months, 60);
        assert_relative_eq!(out.total_cost, out.schedule.total_payment + 3_000.0);
    }

    #[test]
    fn test_trade_in_above_price_pays_no_tax() {
        let input = AutoLoanInput {
            vehicle_price: 4_000.0,
            trade_in_value: 5_000.0,
            ..input()
        };
        assert_eq!(sales_tax(&input), 0.0);
    }

    #[test]
    fn test_nothing_to_finance() {
        let out = calculate_auto_loan(&AutoLoanInput {
            down_payment: 40_000.0,
            ..input()
        });
        assert_eq!(out, Err(CalcError::NonPositive { field: "financed_amount" }));
    }
}
