//! Amortization schedules: simulation, composition, aggregation and chart series

mod state;
mod engine;
mod entries;
mod rate_change;
mod yearly;
pub mod series;
pub mod irr;

pub use state::SimulationState;
pub use engine::{
    ExtraPayment, FullBalance, InterestBase, LoanTerms, LumpSum, NoExtra, PaymentPolicy,
    RateOverride, RateStep, ScheduleSimulator, BALANCE_EPSILON, ITERATION_GUARD_MONTHS,
};
pub use entries::{ScheduleEntry, ScheduleResult, ScheduleSummary, Termination};
pub use rate_change::{compose_rate_change, ComposedSchedule};
pub use yearly::{aggregate_yearly, YearlyOptions, YearlyRecord};
