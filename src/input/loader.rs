//! Load a book of loans from CSV
//!
//! Expected columns: `id,principal,annual_rate_percent,term_months,extra_monthly`.
//! `extra_monthly` may be left empty.

use std::path::Path;

use anyhow::Context;
use csv::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::{LoanTerms, PaymentPolicy};

/// Failure to turn a CSV record into a loan
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row} ({id}): {reason}")]
    InvalidRow { row: usize, id: String, reason: String },
}

/// One loan in the book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRow {
    pub id: String,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    #[serde(default)]
    pub extra_monthly: f64,
}

impl LoanRow {
    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.principal, self.annual_rate_percent, self.term_months)
    }

    pub fn policy(&self) -> PaymentPolicy {
        PaymentPolicy::with_extra(self.extra_monthly)
    }

    fn validate(self, row: usize) -> Result<Self, LoadError> {
        let reason = if !(self.principal.is_finite() && self.principal > 0.0) {
            Some(format!("principal must be positive, got {}", self.principal))
        } else if !(self.annual_rate_percent.is_finite() && self.annual_rate_percent >= 0.0) {
            Some(format!("rate must be non-negative, got {}", self.annual_rate_percent))
        } else if self.term_months == 0 {
            Some("term_months must be at least 1".to_string())
        } else if !(self.extra_monthly.is_finite() && self.extra_monthly >= 0.0) {
            Some(format!("extra_monthly must be non-negative, got {}", self.extra_monthly))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(LoadError::InvalidRow {
                row,
                id: self.id,
                reason,
            }),
            None => Ok(self),
        }
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<LoanRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening loan book {}", path.display()))?;
    let loans = load_loans_from_reader(file)
        .with_context(|| format!("reading loan book {}", path.display()))?;
    log::info!("loaded {} loans from {}", loans.len(), path.display());
    Ok(loans)
}

/// Load loans from any reader (e.g., string buffer, stdin)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanRow>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for (i, result) in csv_reader.deserialize().enumerate() {
        let row: LoanRow = result?;
        // Header is line 1
        loans.push(row.validate(i + 2)?);
    }

    Ok(loans)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = "\
id,principal,annual_rate_percent,term_months,extra_monthly
A1,100000,6,360,
A2,25000,4.5,60,150
";

    #[test]
    fn test_load_from_reader() {
        let loans = load_loans_from_reader(BOOK.as_bytes()).unwrap();
        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].id, "A1");
        assert_eq!(loans[0].extra_monthly, 0.0);
        assert_eq!(loans[1].term_months, 60);
        assert_eq!(loans[1].policy().extra_monthly, 150.0);
    }

    #[test]
    fn test_rejects_bad_row() {
        let book = "id,principal,annual_rate_percent,term_months,extra_monthly\nB1,-5,6,360,0\n";
        match load_loans_from_reader(book.as_bytes()) {
            Err(LoadError::InvalidRow { row, id, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(id, "B1");
            }
            other => panic!("expected invalid row, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unparseable_field() {
        let book = "id,principal,annual_rate_percent,term_months,extra_monthly\nC1,abc,6,360,0\n";
        assert!(matches!(load_loans_from_reader(book.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_loans("no/such/book.csv").unwrap_err();
        assert!(err.to_string().contains("opening loan book"));
    }
}
