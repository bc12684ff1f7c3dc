//! Fixed-length chart series built from schedules

use super::entries::ScheduleResult;
use super::yearly::YearlyRecord;

/// Fit `values` to `len` points: index 0 holds `start`, then the data, then the last
/// known value repeated.
fn pad_series(start: f64, values: impl Iterator<Item = f64>, len: usize) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    let mut series = Vec::with_capacity(len);
    series.push(start);
    series.extend(values.take(len - 1));
    let last = series.last().copied().unwrap_or(start);
    series.resize(len, last);
    series
}

/// Balance at the end of each month, starting from the principal
pub fn monthly_balance_series(schedule: &ScheduleResult, len: usize) -> Vec<f64> {
    pad_series(schedule.principal, schedule.entries.iter().map(|e| e.balance), len)
}

/// Cumulative interest paid by the end of each month, starting from zero
pub fn cumulative_interest_series(schedule: &ScheduleResult, len: usize) -> Vec<f64> {
    let cumulative = schedule.entries.iter().scan(0.0, |acc, e| {
        *acc += e.interest;
        Some(*acc)
    });
    pad_series(0.0, cumulative, len)
}

/// Balance at the end of each year, starting from the principal
pub fn yearly_balance_series(principal: f64, records: &[YearlyRecord], len: usize) -> Vec<f64> {
    pad_series(principal, records.iter().map(|r| r.ending_balance), len)
}

/// Pick `points` evenly spaced samples, always keeping the first and last value
pub fn downsample(values: &[f64], points: usize) -> Vec<f64> {
    if points == 0 || values.is_empty() {
        return Vec::new();
    }
    if points >= values.len() {
        return values.to_vec();
    }
    if points == 1 {
        return vec![values[0]];
    }
    let last = values.len() - 1;
    (0..points)
        .map(|i| values[(i * last + (points - 1) / 2) / (points - 1)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{LoanTerms, ScheduleSimulator};

    #[test]
    fn test_balance_series_padding() {
        let schedule = ScheduleSimulator::for_terms(LoanTerms::new(1_200.0, 0.0, 12)).run();
        let series = monthly_balance_series(&schedule, 20);

        assert_eq!(series.len(), 20);
        assert_eq!(series[0], 1_200.0);
        assert_eq!(series[1], 1_100.0);
        assert_eq!(series[12], 0.0);
        assert_eq!(series[19], 0.0);
    }

    #[test]
    fn test_series_truncates_to_len() {
        let schedule = ScheduleSimulator::for_terms(LoanTerms::new(1_200.0, 0.0, 12)).run();
        let series = monthly_balance_series(&schedule, 4);
        assert_eq!(series, vec![1_200.0, 1_100.0, 1_000.0, 900.0]);
        assert!(monthly_balance_series(&schedule, 0).is_empty());
    }

    #[test]
    fn test_cumulative_interest_is_non_decreasing() {
        let schedule = ScheduleSimulator::for_terms(LoanTerms::new(10_000.0, 8.0, 24)).run();
        let series = cumulative_interest_series(&schedule, 30);
        assert_eq!(series[0], 0.0);
        assert!(series.windows(2).all(|w| w[1] >= w[0]));
        assert!((series[29] - schedule.total_interest).abs() < 1e-9);
    }

    #[test]
    fn test_downsample_keeps_endpoints() {
        let values: Vec<f64> = (0..=100).map(|v| v as f64).collect();
        let sampled = downsample(&values, 5);
        assert_eq!(sampled, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(downsample(&values, 1), vec![0.0]);
        assert_eq!(downsample(&values[..3], 10).len(), 3);
    }
}
