//! Offset mortgage simulation

use serde::{Deserialize, Serialize};

use super::ensure_amortizes;
use crate::error::{require_non_negative, require_positive, CalcResult};
use crate::schedule::{
    InterestBase, LoanTerms, PaymentPolicy, ScheduleResult, ScheduleSimulator, ScheduleSummary,
};

/// How strongly linked savings offset the mortgage balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// Every pound saved offsets a pound of mortgage
    #[default]
    Full,
    /// Savings count at half weight
    Half,
}

impl OffsetMode {
    pub fn weight(&self) -> f64 {
        match self {
            OffsetMode::Full => 1.0,
            OffsetMode::Half => 0.5,
        }
    }
}

/// Linked savings account that reduces the balance interest is charged on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetAccount {
    pub opening_savings: f64,
    pub monthly_contribution: f64,
    pub mode: OffsetMode,
}

impl OffsetAccount {
    /// Savings held during `month` (1-based): contributions arrive at month end
    pub fn savings_in_month(&self, month: u32) -> f64 {
        (self.opening_savings + self.monthly_contribution * month.saturating_sub(1) as f64).max(0.0)
    }
}

impl InterestBase for OffsetAccount {
    fn base(&self, balance: f64, month: u32) -> f64 {
        (balance - self.mode.weight() * self.savings_in_month(month)).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetInput {
    pub balance: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub offset_balance: f64,
    pub monthly_contribution: f64,
    pub mode: OffsetMode,
}

impl Default for OffsetInput {
    fn default() -> Self {
        Self {
            balance: 0.0,
            annual_rate_percent: 5.0,
            term_months: 300,
            offset_balance: 0.0,
            monthly_contribution: 0.0,
            mode: OffsetMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetOutput {
    pub monthly_payment: f64,
    pub baseline: ScheduleSummary,
    pub offset: ScheduleSummary,
    pub interest_saved: f64,
    /// Months earlier the offset mortgage is repaid
    pub months_saved: u32,
    pub years_saved: u32,
    pub remaining_months_saved: u32,
    /// Savings balance when the offset mortgage is repaid
    pub final_savings: f64,
    pub schedule: ScheduleResult,
}

/// Simulate a mortgage with linked savings against a non-offset baseline
pub fn simulate_offset(input: &OffsetInput) -> CalcResult<OffsetOutput> {
    let balance = require_positive("balance", input.balance)?;
    require_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    let opening_savings = require_non_negative("offset_balance", input.offset_balance)?;
    let contribution = require_non_negative("monthly_contribution", input.monthly_contribution)?;

    let sim = ScheduleSimulator::new(
        LoanTerms::new(balance, input.annual_rate_percent, input.term_months.max(1)),
        PaymentPolicy::default(),
    );
    ensure_amortizes(&sim)?;

    let account = OffsetAccount {
        opening_savings,
        monthly_contribution: contribution,
        mode: input.mode,
    };
    let baseline = sim.run();
    let schedule = sim.run_with(&account, sim.policy());

    let interest_saved = baseline.total_interest - schedule.total_interest;
    let months_saved = baseline.months.saturating_sub(schedule.months);

    Ok(OffsetOutput {
        monthly_payment: sim.base_payment(),
        baseline: baseline.summary(),
        offset: schedule.summary(),
        interest_saved,
        months_saved,
        years_saved: months_saved / 12,
        remaining_months_saved: months_saved % 12,
        final_savings: account.savings_in_month(schedule.months + 1),
        schedule,
    })
}
