//! Running state of one amortization walk

/// Balance and month counter carried from one iteration to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Months simulated so far (the next entry is `month + 1`)
    pub month: u32,

    /// Outstanding balance, never negative
    pub balance: f64,
}

impl SimulationState {
    /// Start a walk at month 0. A principal that cannot be priced starts as paid off.
    pub fn opening(principal: f64) -> Self {
        let balance = if principal.is_finite() && principal > 0.0 {
            principal
        } else {
            0.0
        };
        Self { month: 0, balance }
    }

    /// Advance the month counter and return the new month index
    pub fn advance_month(&mut self) -> u32 {
        self.month += 1;
        self.month
    }

    /// Whether the balance is fully repaid
    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }
}
