//! Batch runner for a book of loans
//!
//! Every row is independent, so the book is simulated with rayon and no shared state.

use rayon::prelude::*;

use crate::error::CalcResult;
use crate::input::LoanRow;
use crate::scenarios::ensure_amortizes;
use crate::schedule::{ScheduleSimulator, ScheduleSummary, Termination};

/// Result for one loan in the book
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub id: String,
    pub result: CalcResult<(ScheduleSummary, Termination)>,
}

/// Runs loan rows through the schedule simulator
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    /// Stop every loan after this many months
    horizon_months: Option<u32>,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizon(horizon_months: u32) -> Self {
        Self {
            horizon_months: Some(horizon_months),
        }
    }

    /// Simulate a single loan
    pub fn run(&self, row: &LoanRow) -> BatchOutcome {
        let mut policy = row.policy();
        policy.horizon_months = self.horizon_months;
        let sim = ScheduleSimulator::new(row.terms(), policy);

        let result = ensure_amortizes(&sim).map(|()| {
            let schedule = sim.run();
            (schedule.summary(), schedule.termination)
        });
        if let Err(e) = &result {
            log::warn!("loan {}: {}", row.id, e);
        }

        BatchOutcome {
            id: row.id.clone(),
            result,
        }
    }

    /// Simulate every loan in parallel, preserving input order
    pub fn run_batch(&self, rows: &[LoanRow]) -> Vec<BatchOutcome> {
        rows.par_iter().map(|row| self.run(row)).collect()
    }
}
