//! Expression error types.

use thiserror::Error;

/// Result type for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;

/// Errors that can occur while parsing or evaluating an expression.
#[derive(Debug, Error)]
pub enum ExprError {
    /// Malformed expression source.
    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Unbound variable in expression.
    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String },

    /// Type mismatch in expression.
    #[error("type error: {message}")]
    TypeError { message: String },

    /// Division or modulo by zero.
    #[error("Division by zero")]
    DivisionByZero,
}

impl ExprError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable { name: name.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }
}
