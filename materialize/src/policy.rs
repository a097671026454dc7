//! The continue/abort error policy.

/// What to do with errors captured while the template was evaluated.
///
/// The policy is consulted exactly once, after evaluation and before
/// planning and execution. Errors captured during validation, planning or
/// execution never abort; they downgrade the outcome instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Apply whatever survived; captured errors end up in the report.
    #[default]
    ContinueOnError,
    /// Apply nothing if anything was captured.
    AbortOnError,
}

impl ErrorPolicy {
    /// Whether the given number of captured errors aborts materialization.
    pub fn aborts(&self, captured: usize) -> bool {
        matches!(self, ErrorPolicy::AbortOnError) && captured > 0
    }
}
