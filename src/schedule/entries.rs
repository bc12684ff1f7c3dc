//! Schedule output structures

use serde::{Deserialize, Serialize};

/// How a simulation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Balance reached zero
    PaidOff,
    /// Stopped at the configured horizon with balance outstanding
    Horizon,
    /// Runaway guard hit: the payment never amortized the balance
    IterationGuard,
}

/// A single month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Month index (1-based, contiguous)
    pub month: u32,
    pub opening_balance: f64,
    /// Total paid this month: `interest + principal`
    pub payment: f64,
    pub interest: f64,
    /// All principal repaid this month, including `extra`
    pub principal: f64,
    pub extra: f64,
    /// Balance after this month's payment
    pub balance: f64,
}

impl ScheduleEntry {
    /// Principal repaid by the base payment alone
    pub fn ordinary_principal(&self) -> f64 {
        self.principal - self.extra
    }
}

/// Complete schedule with running totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Starting principal
    pub principal: f64,

    /// Level payment the walk was run with
    pub base_payment: f64,

    /// Monthly entries in order
    pub entries: Vec<ScheduleEntry>,

    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_extra: f64,

    /// Number of months realized
    pub months: u32,

    pub termination: Termination,
}

impl ScheduleResult {
    pub fn new(principal: f64, base_payment: f64) -> Self {
        Self {
            principal,
            base_payment,
            entries: Vec::new(),
            total_payment: 0.0,
            total_interest: 0.0,
            total_principal: 0.0,
            total_extra: 0.0,
            months: 0,
            termination: Termination::PaidOff,
        }
    }

    /// Append an entry and accumulate totals
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.total_payment += entry.payment;
        self.total_interest += entry.interest;
        self.total_principal += entry.principal;
        self.total_extra += entry.extra;
        self.months = entry.month;
        self.entries.push(entry);
    }

    /// Append another schedule's entries, renumbering them to continue this one.
    /// The termination of `next` becomes the termination of the whole.
    pub fn append_continuing(&mut self, next: ScheduleResult) {
        let offset = self.months;
        for entry in next.entries {
            self.add_entry(ScheduleEntry {
                month: entry.month + offset,
                ..entry
            });
        }
        self.termination = next.termination;
    }

    /// Balance outstanding after the last entry
    pub fn final_balance(&self) -> f64 {
        self.entries
            .last()
            .map(|e| e.balance)
            .unwrap_or(if self.principal.is_finite() { self.principal.max(0.0) } else { 0.0 })
    }

    pub fn is_paid_off(&self) -> bool {
        self.termination == Termination::PaidOff
    }

    /// Payment made in each month, in order
    pub fn payment_timeline(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.payment).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            months: self.months,
            base_payment: self.base_payment,
            total_payment: self.total_payment,
            total_interest: self.total_interest,
            total_principal: self.total_principal,
            total_extra: self.total_extra,
            final_balance: self.final_balance(),
            paid_off: self.is_paid_off(),
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months: u32,
    pub base_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_extra: f64,
    pub final_balance: f64,
    pub paid_off: bool,
}
