//! Two-segment schedule for a rate change part-way through a loan

use serde::{Deserialize, Serialize};

use super::engine::{LoanTerms, LumpSum, PaymentPolicy, ScheduleSimulator};
use super::entries::{ScheduleResult, Termination};
use crate::formula::monthly_payment;

/// Continuous schedule made of a pre-change and a post-change segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedSchedule {
    /// Payment before the change
    pub original_payment: f64,

    /// Payment recomputed against the remaining balance and term
    pub new_payment: f64,

    /// First month charged at the new rate
    pub change_month: u32,

    /// Balance when the new rate takes effect
    pub balance_at_change: f64,

    pub schedule: ScheduleResult,
}

/// Compose a rate change after `change_after_months` months.
///
/// Segment A runs at the original rate and payment. Segment B re-levels the payment
/// for the remaining balance over the remaining term (at least one month) and is
/// renumbered to continue A. `policy` extras apply in both segments; the lump-sum
/// month always refers to the overall schedule.
pub fn compose_rate_change(
    terms: LoanTerms,
    policy: &PaymentPolicy,
    new_annual_rate_percent: f64,
    change_after_months: u32,
) -> ComposedSchedule {
    let change_after = change_after_months.min(terms.term_months);

    let first = ScheduleSimulator::new(
        terms,
        PaymentPolicy {
            horizon_months: Some(change_after),
            ..policy.clone()
        },
    );
    let original_payment = first.base_payment();
    let limit = first.iteration_limit();
    let mut schedule = first.run();

    let elapsed = schedule.months;
    let balance_at_change = schedule.final_balance();
    let remaining_term = terms.term_months.saturating_sub(elapsed).max(1);

    let new_payment = monthly_payment(balance_at_change, new_annual_rate_percent, remaining_term);

    if balance_at_change > 0.0 {
        let lump_sum = policy
            .lump_sum
            .filter(|l| l.month > elapsed)
            .map(|l| LumpSum { month: l.month - elapsed, ..l });
        let second = ScheduleSimulator::new(
            LoanTerms::new(balance_at_change, new_annual_rate_percent, remaining_term),
            PaymentPolicy {
                payment_override: None,
                extra_monthly: policy.extra_monthly,
                lump_sum,
                rate_override: None,
                // The composed run shares one iteration guard
                horizon_months: Some(limit.saturating_sub(elapsed)),
            },
        );
        schedule.append_continuing(second.run());
        if !schedule.is_paid_off() && schedule.months >= limit {
            schedule.termination = Termination::IterationGuard;
        }
    }
    schedule.base_payment = original_payment;

    log::debug!(
        "rate change after month {}: payment {:.2} -> {:.2} on {:.2}",
        elapsed,
        original_payment,
        new_payment,
        balance_at_change
    );

    ComposedSchedule {
        original_payment,
        new_payment,
        change_month: elapsed + 1,
        balance_at_change,
        schedule,
    }
}
