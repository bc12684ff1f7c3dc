//! Loan Engine - Amortization simulation and loan/mortgage scenario calculators
//!
//! This library provides:
//! - Closed-form payment formulas (level payment, inverse, interest-only)
//! - A month-by-month schedule simulator with pluggable interest and extra-payment rules
//! - Rate-change composition and yearly aggregation
//! - Scenario analyzers: buy-to-let, rate change, LTV, remortgage, offset, borrowing
//! - Product calculators: general loan, home loan, auto loan, credit card payoff
//! - CSV loan books run in parallel

pub mod error;
pub mod formula;
pub mod schedule;
pub mod scenarios;
pub mod products;
pub mod input;
pub mod batch;

// Re-export commonly used types
pub use error::{outcome_json, CalcError, CalcResult};
pub use schedule::{
    LoanTerms, PaymentPolicy, ScheduleEntry, ScheduleResult, ScheduleSimulator, Termination,
};
pub use input::{load_loans, LoanRow};
pub use batch::{BatchOutcome, BatchRunner};
