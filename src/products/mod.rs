//! Product calculators: thin configurations of the shared schedule simulator

pub mod loan;
pub mod mortgage;
pub mod auto;
pub mod credit_card;

pub use loan::{calculate_loan, LoanInput, LoanOutput};
pub use mortgage::{calculate_mortgage, MortgageInput, MortgageOutput};
pub use auto::{calculate_auto_loan, AutoLoanInput, AutoLoanOutput};
pub use credit_card::{
    calculate_card_payoff, CreditCardInput, CreditCardOutput, PayoffStrategy, Promotion,
};

use chrono::{Months, NaiveDate};

use crate::error::{CalcError, CalcResult};
use crate::scenarios::ensure_amortizes;
use crate::schedule::{ScheduleResult, ScheduleSimulator, Termination};

/// Run a product schedule, rejecting payments that never clear the balance.
///
/// The first-month check catches the common case up front; a run that still ends at
/// the iteration guard (a promotional rate expiring, say) is rejected too.
pub(crate) fn run_to_payoff(sim: &ScheduleSimulator) -> CalcResult<ScheduleResult> {
    ensure_amortizes(sim)?;
    let schedule = sim.run();
    if schedule.termination == Termination::IterationGuard {
        let interest = schedule.entries.last().map(|e| e.interest).unwrap_or(0.0);
        return Err(CalcError::PaymentTooLow {
            payment: schedule.base_payment,
            interest,
        });
    }
    Ok(schedule)
}

/// Date of the final payment when the first falls on `start`
pub fn payoff_date(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{LoanTerms, PaymentPolicy, RateOverride};

    #[test]
    fn test_payoff_date() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(payoff_date(start, 1), Some(start));
        assert_eq!(payoff_date(start, 2), NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(payoff_date(start, 13), NaiveDate::from_ymd_opt(2026, 1, 31));
    }

    #[test]
    fn test_expiring_promotion_rejected() {
        let terms = LoanTerms::new(5_000.0, 30.0, 12);
        let policy = PaymentPolicy {
            payment_override: Some(60.0),
            rate_override: Some(RateOverride::Promotional {
                annual_rate_percent: 0.0,
                months: 3,
            }),
            ..Default::default()
        };
        let sim = ScheduleSimulator::new(terms, policy);
        assert!(matches!(run_to_payoff(&sim), Err(CalcError::PaymentTooLow { .. })));
    }
}
