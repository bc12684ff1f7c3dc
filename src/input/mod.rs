//! Loan book loading

pub mod loader;

pub use loader::{load_loans, load_loans_from_reader, LoadError, LoanRow};
