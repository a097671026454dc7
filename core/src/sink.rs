//! The error sink - ordered, append-only error collection.
//!
//! Every stage of the pipeline records non-fatal failures here instead of
//! propagating them. The sink lives for the duration of one materialization
//! request and is rendered into the user-facing report at the end.

use std::fmt;

/// A non-fatal error captured with an optional origin label (a dotted
/// configuration path, or a description like "property title in type T").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    /// Human-readable message.
    pub message: String,
    /// Where in the configuration the error originated, if known.
    pub origin: Option<String>,
}

impl CapturedError {
    /// Capture an error without an origin label.
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            origin: None,
        }
    }

    /// Capture an error with an origin label.
    pub fn with_origin(error: impl fmt::Display, origin: impl Into<String>) -> Self {
        Self {
            message: error.to_string(),
            origin: Some(origin.into()),
        }
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}: {}", origin, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Append-only ordered collection of captured errors.
#[derive(Debug, Default)]
pub struct ErrorSink {
    errors: Vec<CapturedError>,
}

impl ErrorSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a captured error.
    pub fn push(&mut self, error: CapturedError) {
        self.errors.push(error);
    }

    /// Record an error with an origin label.
    pub fn capture(&mut self, error: impl fmt::Display, origin: impl Into<String>) {
        self.errors.push(CapturedError::with_origin(error, origin));
    }

    /// Number of captured errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The captured errors, in capture order.
    pub fn errors(&self) -> &[CapturedError] {
        &self.errors
    }

    /// Consume the sink, yielding the captured errors.
    pub fn into_errors(self) -> Vec<CapturedError> {
        self.errors
    }
}
