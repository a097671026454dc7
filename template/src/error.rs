//! Template error types.

use thiserror::Error;

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while parsing or evaluating template configuration.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A configuration level carries a key outside its allow-list.
    #[error("Key '{key}' is not allowed in a {level} template level")]
    IllegalKey { key: String, level: &'static str },

    /// A field that must be a map holds something else.
    #[error("Expected a map for '{field}', got {actual}")]
    ExpectedMap { field: &'static str, actual: String },

    /// `withItems` evaluated to a non-iterable value.
    #[error("withItems must evaluate to a list or map, got {actual}")]
    NotIterable { actual: String },

    /// A property evaluated to a non-scalar value.
    #[error("Property '{name}' must be a scalar or null, got {actual}")]
    NonScalarProperty { name: String, actual: String },

    /// `type` or `name` evaluated to something other than a string.
    #[error("'{field}' must evaluate to a string, got {actual}")]
    NonStringField { field: &'static str, actual: String },

    /// Template nesting exceeded the recursion guard.
    #[error("Template nesting exceeds the maximum depth of {max_depth}")]
    MaxDepthExceeded { max_depth: usize },

    /// Expression failure.
    #[error(transparent)]
    Expression(#[from] graft_expr::ExprError),

    /// Malformed YAML input.
    #[error("invalid template YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TemplateError {
    pub fn illegal_key(key: impl Into<String>, level: &'static str) -> Self {
        Self::IllegalKey {
            key: key.into(),
            level,
        }
    }

    pub fn expected_map(field: &'static str, actual: impl Into<String>) -> Self {
        Self::ExpectedMap {
            field,
            actual: actual.into(),
        }
    }

    pub fn not_iterable(actual: impl Into<String>) -> Self {
        Self::NotIterable {
            actual: actual.into(),
        }
    }

    pub fn non_scalar_property(name: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::NonScalarProperty {
            name: name.into(),
            actual: actual.into(),
        }
    }

    pub fn non_string_field(field: &'static str, actual: impl Into<String>) -> Self {
        Self::NonStringField {
            field,
            actual: actual.into(),
        }
    }
}
