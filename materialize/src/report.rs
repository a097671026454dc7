//! The user-facing materialization report.

use graft_core::CapturedError;
use std::fmt;

/// How much of the template ended up applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything applied, nothing captured.
    Applied,
    /// Some mutations applied, some work was dropped along the way.
    PartiallyApplied,
    /// The abort policy fired; the graph is untouched.
    NotApplied,
}

/// Result of one materialization request.
#[derive(Debug)]
pub struct MaterializationReport {
    /// Label of the target node (its path in the graph).
    pub target: String,
    /// Overall outcome.
    pub outcome: Outcome,
    /// Every error captured across all stages, in capture order.
    pub errors: Vec<CapturedError>,
    /// Number of top-level plan operations applied.
    pub operations_applied: usize,
}

impl MaterializationReport {
    /// Returns true when everything applied cleanly.
    pub fn is_clean(&self) -> bool {
        self.outcome == Outcome::Applied && self.errors.is_empty()
    }

    /// One summary line, then one line per captured error.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MaterializationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Applied => write!(f, "template for {} was applied", self.target)?,
            Outcome::PartiallyApplied => {
                write!(f, "template for {} was only partially applied", self.target)?
            }
            Outcome::NotApplied => write!(f, "template for {} was not applied", self.target)?,
        }
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}
