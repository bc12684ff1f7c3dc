//! Closed-form payment formulas
//!
//! Every function here degrades to `0.0` on input it cannot price (non-finite values,
//! a non-positive principal or payment, a zero term). This is deliberate: the simulator
//! relies on never seeing a `NaN` payment, which would defeat its termination guard.

/// Months per year under the fixed monthly-compounding convention
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Convert an annual percentage into the per-month rate.
///
/// Returns `0.0` when the input is not finite.
pub fn period_rate(annual_rate_percent: f64) -> f64 {
    let r = annual_rate_percent / 100.0 / MONTHS_PER_YEAR;
    if r.is_finite() { r } else { 0.0 }
}

/// Level monthly payment that fully amortizes `principal` over `months`.
///
/// A zero rate gives `principal / months`. Invalid input returns `0.0`.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    if !principal.is_finite() || principal <= 0.0 || months == 0 {
        return 0.0;
    }
    let raw = annual_rate_percent / 100.0 / MONTHS_PER_YEAR;
    if !raw.is_finite() {
        return 0.0;
    }
    let n = months as f64;
    if raw == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + raw).powf(n);
    let payment = principal * raw * growth / (growth - 1.0);
    if payment.is_finite() { payment } else { 0.0 }
}

/// Principal that a level `payment` can support over `months`.
///
/// Inverse of [`monthly_payment`], with the same zero-rate case and the same
/// degrade-to-zero policy.
pub fn principal_from_payment(payment: f64, annual_rate_percent: f64, months: u32) -> f64 {
    if !payment.is_finite() || payment <= 0.0 || months == 0 {
        return 0.0;
    }
    let raw = annual_rate_percent / 100.0 / MONTHS_PER_YEAR;
    if !raw.is_finite() {
        return 0.0;
    }
    let n = months as f64;
    if raw == 0.0 {
        return payment * n;
    }

    let principal = payment * (1.0 - (1.0 + raw).powf(-n)) / raw;
    if principal.is_finite() { principal } else { 0.0 }
}

/// Interest-only monthly payment (no principal reduction)
pub fn interest_only_payment(principal: f64, annual_rate_percent: f64) -> f64 {
    if !principal.is_finite() || principal <= 0.0 {
        return 0.0;
    }
    principal * period_rate(annual_rate_percent)
}

/// Convert a term in years to whole months (at least one).
pub fn years_to_months(years: f64) -> u32 {
    if !years.is_finite() || years <= 0.0 {
        return 1;
    }
    ((years * MONTHS_PER_YEAR).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_mortgage_payment() {
        // 6% over 30 years
        let payment = monthly_payment(100_000.0, 6.0, 360);
        assert_relative_eq!(payment, 599.55, epsilon = 0.005);
    }

    #[test]
    fn test_zero_rate_payment() {
        assert_eq!(monthly_payment(12_000.0, 0.0, 24), 500.0);
        assert_eq!(principal_from_payment(500.0, 0.0, 24), 12_000.0);
    }

    #[test]
    fn test_invalid_input_degrades_to_zero() {
        assert_eq!(monthly_payment(0.0, 5.0, 12), 0.0);
        assert_eq!(monthly_payment(-10.0, 5.0, 12), 0.0);
        assert_eq!(monthly_payment(f64::NAN, 5.0, 12), 0.0);
        assert_eq!(monthly_payment(1000.0, f64::INFINITY, 12), 0.0);
        assert_eq!(monthly_payment(1000.0, 5.0, 0), 0.0);
        assert_eq!(principal_from_payment(f64::NAN, 5.0, 12), 0.0);
        assert_eq!(principal_from_payment(100.0, 5.0, 0), 0.0);
        assert_eq!(period_rate(f64::NAN), 0.0);
    }

    #[test]
    fn test_round_trip() {
        for &(p, r, n) in &[(250_000.0, 4.5, 300), (18_000.0, 7.9, 60), (5_000.0, 19.9, 24)] {
            let payment = monthly_payment(p, r, n);
            assert_relative_eq!(principal_from_payment(payment, r, n), p, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_interest_only() {
        assert_relative_eq!(interest_only_payment(200_000.0, 6.0), 1000.0, epsilon = 1e-9);
        assert_eq!(interest_only_payment(0.0, 6.0), 0.0);
    }

    #[test]
    fn test_years_to_months() {
        assert_eq!(years_to_months(25.0), 300);
        assert_eq!(years_to_months(0.0), 1);
        assert_eq!(years_to_months(2.5), 30);
    }
}
