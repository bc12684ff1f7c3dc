//! General personal/installment loan with overpayments and fees

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{payoff_date, run_to_payoff};
use crate::error::{require_non_negative, require_positive, CalcResult};
use crate::schedule::irr::apr_with_fees;
use crate::schedule::{
    aggregate_yearly, LoanTerms, LumpSum, PaymentPolicy, ScheduleResult, ScheduleSimulator,
    ScheduleSummary, YearlyOptions, YearlyRecord,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub extra_monthly: f64,
    pub lump_sum: Option<LumpSum>,
    /// Fees deducted from the advance, used for the APR
    pub upfront_fees: f64,
    pub start_date: Option<NaiveDate>,
}

impl Default for LoanInput {
    fn default() -> Self {
        Self {
            principal: 0.0,
            annual_rate_percent: 7.0,
            term_months: 60,
            extra_monthly: 0.0,
            lump_sum: None,
            upfront_fees: 0.0,
            start_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOutput {
    pub monthly_payment: f64,
    pub summary: ScheduleSummary,
    /// Same loan without any overpayments
    pub baseline: ScheduleSummary,
    pub interest_saved: f64,
    pub months_saved: u32,
    /// APR including up-front fees, when it can be solved
    pub apr: Option<f64>,
    pub payoff_date: Option<NaiveDate>,
    pub yearly: Vec<YearlyRecord>,
    pub schedule: ScheduleResult,
}

/// Amortize a general loan and measure the effect of overpayments
pub fn calculate_loan(input: &LoanInput) -> CalcResult<LoanOutput> {
    let principal = require_positive("principal", input.principal)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    let extra = require_non_negative("extra_monthly", input.extra_monthly)?;
    let fees = require_non_negative("upfront_fees", input.upfront_fees)?;
    let term = input.term_months.max(1);

    let terms = LoanTerms::new(principal, input.annual_rate_percent, term);
    let baseline = run_to_payoff(&ScheduleSimulator::for_terms(terms))?;
    let sim = ScheduleSimulator::new(
        terms,
        PaymentPolicy {
            extra_monthly: extra,
            lump_sum: input.lump_sum,
            ..Default::default()
        },
    );
    let schedule = run_to_payoff(&sim)?;

    let yearly = aggregate_yearly(
        &schedule,
        &YearlyOptions {
            start_date: input.start_date,
            expected_years: None,
        },
    );

    Ok(LoanOutput {
        monthly_payment: schedule.base_payment,
        summary: schedule.summary(),
        baseline: baseline.summary(),
        interest_saved: baseline.total_interest - schedule.total_interest,
        months_saved: baseline.months.saturating_sub(schedule.months),
        apr: apr_with_fees(&baseline, fees),
        payoff_date: input.start_date.and_then(|d| payoff_date(d, schedule.months)),
        yearly,
        schedule,
    })
}
