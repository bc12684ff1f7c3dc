//! Interest-rate change comparison

use serde::{Deserialize, Serialize};

use super::ensure_amortizes;
use crate::error::{require_non_negative, require_positive, CalcResult};
use crate::schedule::{
    compose_rate_change, LoanTerms, PaymentPolicy, ScheduleSimulator, ScheduleSummary,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateChangeInput {
    pub principal: f64,
    pub current_rate_percent: f64,
    pub new_rate_percent: f64,
    pub term_months: u32,
    /// Months paid at the current rate before the change takes effect
    pub change_after_months: u32,
}

impl Default for RateChangeInput {
    fn default() -> Self {
        Self {
            principal: 0.0,
            current_rate_percent: 5.0,
            new_rate_percent: 5.0,
            term_months: 300,
            change_after_months: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChangeOutput {
    pub current_payment: f64,
    pub new_payment: f64,
    /// `new_payment - current_payment`
    pub payment_difference: f64,
    pub change_month: u32,
    pub balance_at_change: f64,
    pub baseline: ScheduleSummary,
    pub changed: ScheduleSummary,
    /// `changed.total_interest - baseline.total_interest`
    pub interest_difference: f64,
    /// Monthly payments at the current rate, padded with zeros to the common length
    pub baseline_payments: Vec<f64>,
    /// Monthly payments with the rate change applied, same length as `baseline_payments`
    pub changed_payments: Vec<f64>,
}

/// Compare staying at the current rate against moving to a new rate
pub fn compare_rate_change(input: &RateChangeInput) -> CalcResult<RateChangeOutput> {
    let principal = require_positive("principal", input.principal)?;
    require_non_negative("current_rate_percent", input.current_rate_percent)?;
    require_non_negative("new_rate_percent", input.new_rate_percent)?;
    let term = input.term_months.max(1);

    let terms = LoanTerms::new(principal, input.current_rate_percent, term);
    let baseline_sim = ScheduleSimulator::for_terms(terms);
    ensure_amortizes(&baseline_sim)?;
    let baseline = baseline_sim.run();

    let composed = compose_rate_change(
        terms,
        &PaymentPolicy::default(),
        input.new_rate_percent,
        input.change_after_months,
    );

    let len = baseline.entries.len().max(composed.schedule.entries.len());
    let mut baseline_payments = baseline.payment_timeline();
    let mut changed_payments = composed.schedule.payment_timeline();
    baseline_payments.resize(len, 0.0);
    changed_payments.resize(len, 0.0);

    Ok(RateChangeOutput {
        current_payment: composed.original_payment,
        new_payment: composed.new_payment,
        payment_difference: composed.new_payment - composed.original_payment,
        change_month: composed.change_month,
        balance_at_change: composed.balance_at_change,
        baseline: baseline.summary(),
        changed: composed.schedule.summary(),
        interest_difference: composed.schedule.total_interest - baseline.total_interest,
        baseline_payments,
        changed_payments,
    })
}
