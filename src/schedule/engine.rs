//! Generic month-by-month amortization walk
//!
//! Every product (general loans, home loans, auto loans, credit cards, offset
//! mortgages) is a configuration of [`ScheduleSimulator`]. Interest accrual and extra
//! payments are injected through the [`InterestBase`] and [`ExtraPayment`] strategies.

use serde::{Deserialize, Serialize};

use super::entries::{ScheduleEntry, ScheduleResult, Termination};
use super::state::SimulationState;
use crate::formula::{monthly_payment, period_rate};

/// Months allowed beyond the contractual term before a run is cut off
pub const ITERATION_GUARD_MONTHS: u32 = 1200;

/// Remaining balance below this share of the opening principal (and never less than
/// this absolute amount) is treated as repaid
pub const BALANCE_EPSILON: f64 = 1e-6;

/// Contractual loan terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
        }
    }

    /// Level payment that amortizes these terms exactly
    pub fn level_payment(&self) -> f64 {
        monthly_payment(self.principal, self.annual_rate_percent, self.term_months)
    }

    /// Interest charged on the full principal in month 1 at the contractual rate
    pub fn first_month_interest(&self) -> f64 {
        if self.principal.is_finite() && self.principal > 0.0 {
            self.principal * period_rate(self.annual_rate_percent)
        } else {
            0.0
        }
    }
}

/// One-time payment applied in a specific month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSum {
    /// Month index (1-based) the lump sum is paid in
    pub month: u32,
    pub amount: f64,
}

/// A rate that takes effect from a given month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStep {
    pub from_month: u32,
    pub annual_rate_percent: f64,
}

/// Per-month override of the contractual rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateOverride {
    /// Introductory rate for the first `months` months, contractual rate afterwards
    Promotional { annual_rate_percent: f64, months: u32 },
    /// Variable rate: the latest step whose `from_month` has been reached applies
    Stepped { steps: Vec<RateStep> },
}

impl RateOverride {
    /// Annual rate for `month`, or `None` when the contractual rate applies
    pub fn annual_rate_for(&self, month: u32) -> Option<f64> {
        match self {
            RateOverride::Promotional { annual_rate_percent, months } => {
                (month <= *months).then_some(*annual_rate_percent)
            }
            RateOverride::Stepped { steps } => steps
                .iter()
                .filter(|s| s.from_month <= month)
                .max_by_key(|s| s.from_month)
                .map(|s| s.annual_rate_percent),
        }
    }
}

/// Payment configuration for a run
///
/// Every field has a neutral default: no override, no extras, no horizon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentPolicy {
    /// Fixed monthly payment; when `None` the level payment for the terms is used
    pub payment_override: Option<f64>,

    /// Constant extra principal paid every month
    pub extra_monthly: f64,

    /// One-time extra payment
    pub lump_sum: Option<LumpSum>,

    /// Promotional or variable rate
    pub rate_override: Option<RateOverride>,

    /// Stop after this many months even if balance remains
    pub horizon_months: Option<u32>,
}

impl PaymentPolicy {
    pub fn with_payment(payment: f64) -> Self {
        Self {
            payment_override: Some(payment),
            ..Default::default()
        }
    }

    pub fn with_extra(extra_monthly: f64) -> Self {
        Self {
            extra_monthly,
            ..Default::default()
        }
    }
}

/// Amount interest is charged on in a given month
pub trait InterestBase {
    fn base(&self, balance: f64, month: u32) -> f64;
}

/// Interest accrues on the whole outstanding balance
#[derive(Debug, Clone, Copy, Default)]
pub struct FullBalance;

impl InterestBase for FullBalance {
    fn base(&self, balance: f64, _month: u32) -> f64 {
        balance
    }
}

/// Extra principal requested in a given month
pub trait ExtraPayment {
    fn extra(&self, month: u32) -> f64;
}

/// No extra payments at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtra;

impl ExtraPayment for NoExtra {
    fn extra(&self, _month: u32) -> f64 {
        0.0
    }
}

impl ExtraPayment for PaymentPolicy {
    fn extra(&self, month: u32) -> f64 {
        let mut extra = non_negative(self.extra_monthly);
        if let Some(lump) = self.lump_sum {
            if lump.month == month {
                extra += non_negative(lump.amount);
            }
        }
        extra
    }
}

/// Clamp to zero anything negative or not finite
fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Month-by-month amortization simulator
#[derive(Debug, Clone)]
pub struct ScheduleSimulator {
    terms: LoanTerms,
    policy: PaymentPolicy,
}

impl ScheduleSimulator {
    pub fn new(terms: LoanTerms, policy: PaymentPolicy) -> Self {
        Self { terms, policy }
    }

    /// Simulate the contractual terms with no extras
    pub fn for_terms(terms: LoanTerms) -> Self {
        Self::new(terms, PaymentPolicy::default())
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn policy(&self) -> &PaymentPolicy {
        &self.policy
    }

    /// Payment the walk uses each month before extras
    pub fn base_payment(&self) -> f64 {
        match self.policy.payment_override {
            Some(payment) => non_negative(payment),
            None => self.terms.level_payment(),
        }
    }

    /// Upper bound on loop iterations
    pub fn iteration_limit(&self) -> u32 {
        self.terms.term_months.saturating_add(ITERATION_GUARD_MONTHS)
    }

    /// Interest due in month 1 on the full principal, honouring any rate override
    pub fn first_month_interest(&self) -> f64 {
        let state = SimulationState::opening(self.terms.principal);
        state.balance * self.rate_for(1)
    }

    /// Run with interest on the full balance and the policy's own extras
    pub fn run(&self) -> ScheduleResult {
        self.run_with(&FullBalance, &self.policy)
    }

    /// Run with injected interest-base and extra-payment strategies
    pub fn run_with(&self, base: &dyn InterestBase, extras: &dyn ExtraPayment) -> ScheduleResult {
        let payment = self.base_payment();
        let limit = self.iteration_limit();
        let horizon = self.policy.horizon_months.unwrap_or(u32::MAX);

        let mut state = SimulationState::opening(self.terms.principal);
        let mut result = ScheduleResult::new(state.balance, payment);
        let tolerance = BALANCE_EPSILON * state.balance.max(1.0);

        log::debug!(
            "schedule: principal={:.2} rate={}% term={} payment={:.2}",
            state.balance,
            self.terms.annual_rate_percent,
            self.terms.term_months,
            payment
        );

        while !state.is_paid_off() && state.month < limit && state.month < horizon {
            let month = state.advance_month();
            let entry = self.calculate_month(&mut state, month, payment, tolerance, base, extras);
            result.add_entry(entry);
        }

        result.termination = if state.is_paid_off() {
            Termination::PaidOff
        } else if state.month >= limit {
            log::warn!(
                "schedule did not amortize within {} months, {:.2} outstanding",
                limit,
                state.balance
            );
            Termination::IterationGuard
        } else {
            Termination::Horizon
        };

        result
    }

    /// Period rate for `month`, honouring any override
    fn rate_for(&self, month: u32) -> f64 {
        let annual = self
            .policy
            .rate_override
            .as_ref()
            .and_then(|o| o.annual_rate_for(month))
            .unwrap_or(self.terms.annual_rate_percent);
        period_rate(annual)
    }

    /// Compute a single month and update the state
    fn calculate_month(
        &self,
        state: &mut SimulationState,
        month: u32,
        payment: f64,
        tolerance: f64,
        base: &dyn InterestBase,
        extras: &dyn ExtraPayment,
    ) -> ScheduleEntry {
        let opening = state.balance;

        let interest_base = non_negative(base.base(opening, month)).min(opening);
        let interest = non_negative(interest_base * self.rate_for(month));

        // Ordinary amortization first, extras only fill what is left
        let mut ordinary = (payment - interest).max(0.0).min(opening);
        let extra = non_negative(extras.extra(month)).min(opening - ordinary);

        let remainder = opening - ordinary - extra;
        // Rounding drift grows with the principal
        let closing = if remainder < tolerance {
            ordinary += remainder.max(0.0);
            0.0
        } else {
            remainder
        };
        let principal = ordinary + extra;

        state.balance = closing;

        ScheduleEntry {
            month,
            opening_balance: opening,
            payment: interest + principal,
            interest,
            principal,
            extra,
            balance: closing,
        }
    }
}
