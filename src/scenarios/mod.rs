//! Named financial scenarios assembled from the schedule engine
//!
//! Every analyzer takes a plain input struct (all fields defaulted, so partial JSON
//! requests deserialize) and returns [`CalcResult`](crate::error::CalcResult): either
//! the output or the domain rule that was violated.

pub mod buy_to_let;
pub mod rate_change;
pub mod ltv;
pub mod remortgage;
pub mod offset;
pub mod borrowing;

pub use buy_to_let::{project_buy_to_let, BuyToLetInput, BuyToLetOutput};
pub use rate_change::{compare_rate_change, RateChangeInput, RateChangeOutput};
pub use ltv::{calculate_ltv, LtvBand, LtvBasis, LtvInput, LtvOutput};
pub use remortgage::{analyze_remortgage, RemortgageInput, RemortgageOutput};
pub use offset::{simulate_offset, OffsetInput, OffsetMode, OffsetOutput};
pub use borrowing::{solve_borrowing_capacity, BorrowingInput, BorrowingMethod, BorrowingOutput};

use crate::error::{CalcError, CalcResult};
use crate::schedule::ScheduleSimulator;

/// Rate moves examined by the sensitivity sweeps: -2% to +2% in 0.5% steps
const SWEEP_STEPS: [f64; 9] = [-2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0];

/// Rates around `current` for a sensitivity sweep, skipping negative rates
pub(crate) fn rate_sweep(current: f64) -> Vec<f64> {
    SWEEP_STEPS
        .iter()
        .map(|step| current + step)
        .filter(|rate| *rate >= 0.0)
        .collect()
}

/// Reject a configuration whose payment cannot cover the first month's interest
pub(crate) fn ensure_amortizes(sim: &ScheduleSimulator) -> CalcResult<()> {
    let payment = sim.base_payment() + sim.policy().extra_monthly.max(0.0);
    let interest = sim.first_month_interest();
    if sim.terms().principal > 0.0 && payment <= interest {
        return Err(CalcError::PaymentTooLow { payment, interest });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{LoanTerms, PaymentPolicy};

    #[test]
    fn test_rate_sweep() {
        let rates = rate_sweep(5.0);
        assert_eq!(rates.len(), 9);
        assert_eq!(rates[0], 3.0);
        assert_eq!(rates[8], 7.0);
        assert_eq!(rate_sweep(1.0), vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_ensure_amortizes() {
        let terms = LoanTerms::new(10_000.0, 12.0, 12);
        assert!(ensure_amortizes(&ScheduleSimulator::for_terms(terms)).is_ok());

        let sim = ScheduleSimulator::new(terms, PaymentPolicy::with_payment(100.0));
        assert_eq!(
            ensure_amortizes(&sim),
            Err(CalcError::PaymentTooLow { payment: 100.0, interest: 100.0 })
        );
    }
}
