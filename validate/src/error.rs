//! Validation error types.

use thiserror::Error;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Schema mismatches captured during property and reference validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Property '{name}' is a reserved internal name")]
    ReservedProperty { name: String },

    #[error("Property '{name}' is not declared on type '{type_name}'")]
    UndeclaredProperty { name: String, type_name: String },

    #[error("Property '{name}' expects {expected}, got {actual}")]
    KindMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Property '{name}' could not be converted to {class}: {message}")]
    ConversionFailed {
        name: String,
        class: String,
        message: String,
    },

    #[error("Reference '{name}': no node with identifier '{identifier}'")]
    ReferenceNotFound { name: String, identifier: String },

    #[error("Reference '{name}' expects a node or identifier, got {actual}")]
    InvalidReferenceValue { name: String, actual: String },
}

impl ValidationError {
    pub fn reserved_property(name: impl Into<String>) -> Self {
        Self::ReservedProperty { name: name.into() }
    }

    pub fn undeclared_property(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UndeclaredProperty {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn kind_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::KindMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn conversion_failed(
        name: impl Into<String>,
        class: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConversionFailed {
            name: name.into(),
            class: class.into(),
            message: message.into(),
        }
    }

    pub fn reference_not_found(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            name: name.into(),
            identifier: identifier.into(),
        }
    }

    pub fn invalid_reference_value(name: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidReferenceValue {
            name: name.into(),
            actual: actual.into(),
        }
    }
}
