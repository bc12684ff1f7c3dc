//! Fold monthly schedules into yearly records

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::engine::ITERATION_GUARD_MONTHS;
use super::entries::ScheduleResult;

/// Padding never runs more than this many years past the realized schedule
const MAX_PADDED_YEARS: u32 = ITERATION_GUARD_MONTHS / 12;

/// Totals for one year of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    /// Year index (1-based)
    pub year: u32,

    /// Calendar year label when the schedule has a start date
    pub calendar_year: Option<i32>,

    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub extra: f64,

    /// Balance after the last month in this year
    pub ending_balance: f64,
}

impl YearlyRecord {
    fn empty(year: u32, calendar_year: Option<i32>) -> Self {
        Self {
            year,
            calendar_year,
            payment: 0.0,
            principal: 0.0,
            interest: 0.0,
            extra: 0.0,
            ending_balance: 0.0,
        }
    }
}

/// Options for yearly aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearlyOptions {
    /// Date of the first payment; buckets become calendar years when set
    pub start_date: Option<NaiveDate>,

    /// Pad with zero-valued records up to this many years (bounded past the schedule)
    pub expected_years: Option<u32>,
}

/// Calendar year of the given 1-based schedule month
fn calendar_year_of(start: NaiveDate, month: u32) -> i32 {
    start
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .map(|d| d.year())
        .unwrap_or_else(|| start.year())
}

/// Bucket a schedule into yearly records
pub fn aggregate_yearly(schedule: &ScheduleResult, options: &YearlyOptions) -> Vec<YearlyRecord> {
    let mut records: Vec<YearlyRecord> = Vec::new();

    for entry in &schedule.entries {
        let calendar_year = options.start_date.map(|d| calendar_year_of(d, entry.month));
        let is_new_bucket = match (records.last(), calendar_year) {
            (None, _) => true,
            (Some(last), Some(cy)) => last.calendar_year != Some(cy),
            (Some(last), None) => last.year != entry.month.div_ceil(12),
        };
        if is_new_bucket {
            let year = records.len() as u32 + 1;
            records.push(YearlyRecord::empty(year, calendar_year));
        }

        if let Some(record) = records.last_mut() {
            record.payment += entry.payment;
            record.principal += entry.principal;
            record.interest += entry.interest;
            record.extra += entry.extra;
            record.ending_balance = entry.balance;
        }
    }

    if let Some(expected) = options.expected_years {
        let expected = expected.min(records.len() as u32 + MAX_PADDED_YEARS);
        while (records.len() as u32) < expected {
            let year = records.len() as u32 + 1;
            let calendar_year = match (records.last(), options.start_date) {
                (Some(last), _) => last.calendar_year.map(|cy| cy + 1),
                (None, Some(d)) => Some(d.year()),
                (None, None) => None,
            };
            records.push(YearlyRecord::empty(year, calendar_year));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{LoanTerms, PaymentPolicy, ScheduleSimulator};
    use approx::assert_relative_eq;

    fn schedule() -> ScheduleResult {
        ScheduleSimulator::for_terms(LoanTerms::new(24_000.0, 5.0, 36)).run()
    }

    #[test]
    fn test_buckets_by_year_index() {
        let result = schedule();
        let years = aggregate_yearly(&result, &YearlyOptions::default());

        assert_eq!(years.len(), 3);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[2].ending_balance, 0.0);
        let interest: f64 = years.iter().map(|y| y.interest).sum();
        assert_relative_eq!(interest, result.total_interest, max_relative = 1e-12);
        assert_relative_eq!(years[0].ending_balance, result.entries[11].balance);
    }

    #[test]
    fn test_calendar_buckets() {
        let result = schedule();
        let options = YearlyOptions {
            start_date: NaiveDate::from_ymd_opt(2024, 10, 1),
            expected_years: None,
        };
        let years = aggregate_yearly(&result, &options);

        // Oct 2024 .. Sep 2027 spans four calendar years
        assert_eq!(years.len(), 4);
        assert_eq!(years[0].calendar_year, Some(2024));
        assert_eq!(years[3].calendar_year, Some(2027));
        assert_relative_eq!(years[0].payment, result.base_payment * 3.0, max_relative = 1e-9);
    }

    #[test]
    fn test_padding_after_early_payoff() {
        let terms = LoanTerms::new(24_000.0, 5.0, 60);
        let result = ScheduleSimulator::new(terms, PaymentPolicy::with_extra(1_000.0)).run();
        let options = YearlyOptions {
            start_date: None,
            expected_years: Some(5),
        };
        let years = aggregate_yearly(&result, &options);

        assert_eq!(years.len(), 5);
        assert_eq!(years[4].payment, 0.0);
        assert_eq!(years[4].ending_balance, 0.0);
        assert_eq!(years[4].year, 5);
    }

    #[test]
    fn test_padding_continues_calendar_labels() {
        let result = ScheduleSimulator::for_terms(LoanTerms::new(1_000.0, 0.0, 12)).run();
        let options = YearlyOptions {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            expected_years: Some(3),
        };
        let years = aggregate_yearly(&result, &options);
        let labels: Vec<Option<i32>> = years.iter().map(|y| y.calendar_year).collect();
        assert_eq!(labels, vec![Some(2025), Some(2026), Some(2027)]);
    }

    #[test]
    fn test_padding_is_bounded() {
        let result = schedule();
        let options = YearlyOptions {
            start_date: None,
            expected_years: Some(u32::MAX),
        };
        let years = aggregate_yearly(&result, &options);
        assert_eq!(years.len(), 3 + 100);
        assert_eq!(years.last().unwrap().payment, 0.0);
    }
}
