//! Internal Rate of Return (IRR) calculation
//!
//! Used to express the true cost of a loan with up-front fees as an APR

use super::entries::ScheduleResult;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;

/// Periodic IRR of a series of cash flows using Newton-Raphson, falling back to
/// bisection when the derivative vanishes or the iteration does not settle.
///
/// Returns `None` when the flows have no sign change or no root is bracketed.
pub fn periodic_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }
    if cashflows.iter().all(|&cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_positive = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_negative = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.05 / 12.0;
    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);
        if dnpv.abs() < 1e-20 {
            return irr_bisection(cashflows);
        }

        let next = (rate - npv / dnpv).clamp(-0.99, 10.0);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    irr_bisection(cashflows)
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;
    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }
    (npv, dnpv)
}

fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = -0.99_f64;
    let mut high = 10.0_f64;
    let mut npv_low = npv_at_rate(cashflows, low);
    if npv_low * npv_at_rate(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }
    None
}

/// Nominal APR (percent) of a schedule when `fees` are deducted from the advance.
///
/// The borrower receives `principal - fees` and makes the scheduled payments; the
/// monthly IRR of that stream times twelve is the APR.
pub fn apr_with_fees(schedule: &ScheduleResult, fees: f64) -> Option<f64> {
    let advance = schedule.principal - fees.max(0.0);
    if advance <= 0.0 || schedule.entries.is_empty() {
        return None;
    }
    let mut flows = Vec::with_capacity(schedule.entries.len() + 1);
    flows.push(advance);
    flows.extend(schedule.entries.iter().map(|e| -e.payment));
    periodic_irr(&flows).map(|monthly| monthly * 12.0 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{LoanTerms, ScheduleSimulator};
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_irr() {
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let monthly = periodic_irr(&cashflows).unwrap();
        let annual = (1.0 + monthly).powi(12) - 1.0;
        assert!((annual - 0.10).abs() < 0.001, "Expected ~10% IRR, got {}", annual);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(periodic_irr(&[100.0, 50.0]), None);
        assert_eq!(periodic_irr(&[]), None);
    }

    #[test]
    fn test_apr_without_fees_is_contract_rate() {
        let schedule = ScheduleSimulator::for_terms(LoanTerms::new(20_000.0, 7.5, 60)).run();
        let apr = apr_with_fees(&schedule, 0.0).unwrap();
        assert_relative_eq!(apr, 7.5, epsilon = 1e-6);
    }

    #[test]
    fn test_fees_raise_apr() {
        let schedule = ScheduleSimulator::for_terms(LoanTerms::new(20_000.0, 7.5, 60)).run();
        let apr = apr_with_fees(&schedule, 500.0).unwrap();
        assert!(apr > 7.5);
        assert!(apr_with_fees(&schedule, 25_000.0).is_none());
    }
}
