//! Domain errors returned by the scenario and product calculators

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Expected domain failures. These are returned as values, never raised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Payment of {payment:.2} does not cover the first month's interest of {interest:.2}")]
    PaymentTooLow { payment: f64, interest: f64 },

    #[error("Deposit must be less than the property price")]
    DepositNotBelowPrice,

    #[error("Affordable payment of {payment:.2} leaves nothing to borrow against")]
    NoAffordablePayment { payment: f64 },
}

pub type CalcResult<T> = Result<T, CalcError>;

impl Serialize for CalcError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a CalcError,
}

/// Render a calculator outcome for the UI layer.
///
/// Successful outputs serialize as-is; failures become `{"error": "<message>"}` so
/// callers can branch on the presence of the field.
pub fn outcome_json<T: Serialize>(outcome: &CalcResult<T>) -> serde_json::Value {
    let value = match outcome {
        Ok(output) => serde_json::to_value(output),
        Err(error) => serde_json::to_value(ErrorBody { error }),
    };
    value.unwrap_or(serde_json::Value::Null)
}

/// Reject values that are not finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::NonPositive { field })
    }
}

/// Reject values that are negative or not finite.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidInput {
            field,
            reason: format!("must be a non-negative number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_renders_as_field() {
        let outcome: CalcResult<f64> = Err(CalcError::DepositNotBelowPrice);
        let json = outcome_json(&outcome);
        assert_eq!(json["error"], "Deposit must be less than the property price");
    }

    #[test]
    fn test_success_renders_output() {
        let outcome: CalcResult<f64> = Ok(12.5);
        assert_eq!(outcome_json(&outcome), serde_json::json!(12.5));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("principal", 1.0).is_ok());
        assert_eq!(
            require_positive("principal", 0.0),
            Err(CalcError::NonPositive { field: "principal" })
        );
        assert!(require_positive("principal", f64::NAN).is_err());
        assert!(require_non_negative("extra", -1.0).is_err());
        assert!(require_non_negative("extra", 0.0).is_ok());
    }
}
