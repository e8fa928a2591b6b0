//! # Error Module
//!
//! Domain errors for Ancla using thiserror.

use crate::model::LoanStatus;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> list of messages, same shape the backend uses for `errors`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Core domain errors.
///
/// Business and calculation errors only, nothing about transport.
#[derive(Debug, Error)]
pub enum CoreError {
    // === Calculation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid interest rate: {0}")]
    InvalidRate(Decimal),

    #[error("Invalid term: {0} periods (must be at least 1)")]
    InvalidTerm(u32),

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    // === Lifecycle errors ===
    #[error("Cannot transition loan from {from} to {to}")]
    InvalidTransition { from: LoanStatus, to: LoanStatus },

    // === Parsing errors ===
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    // === Validation errors ===
    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    pub fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }

    /// Field errors, if this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CoreError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    /// Errors caused by bad calculator input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidAmount(_) | CoreError::InvalidRate(_) | CoreError::InvalidTerm(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidTerm(0);
        assert_eq!(err.to_string(), "Invalid term: 0 periods (must be at least 1)");

        let err = CoreError::InvalidRate(dec!(-0.1));
        assert_eq!(err.to_string(), "Invalid interest rate: -0.1");

        let err = CoreError::InvalidTransition {
            from: LoanStatus::Closed,
            to: LoanStatus::Active,
        };
        assert_eq!(err.to_string(), "Cannot transition loan from Closed to Active");
    }

    #[test]
    fn test_validation_summary() {
        let mut errors = FieldErrors::new();
        errors.insert("dpi".to_string(), vec!["must be 13 digits".to_string()]);
        errors.insert(
            "phone".to_string(),
            vec!["required".to_string(), "must be 8 digits".to_string()],
        );
        let err = CoreError::Validation(errors);

        assert!(err.is_validation_error());
        assert_eq!(
            err.to_string(),
            "Validation failed: dpi: must be 13 digits; phone: required, must be 8 digits"
        );
        assert_eq!(err.field_errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::InvalidAmount("0".into()).is_input_error());
        assert!(CoreError::InvalidTerm(0).is_input_error());
        assert!(!CoreError::Overflow("payment").is_input_error());
        assert!(CoreError::Overflow("payment").field_errors().is_none());
    }
}
