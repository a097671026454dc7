//! Orchestration error types.

use graft_core::NodeId;
use graft_template::TemplateError;
use thiserror::Error;

/// Fatal orchestration failures. Everything recoverable goes through the
/// error sink instead.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("Target node {id} does not exist")]
    UnknownTarget { id: NodeId },

    /// Structural errors at the template root are fatal; there is nothing
    /// left to evaluate.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl MaterializeError {
    pub fn unknown_target(id: NodeId) -> Self {
        Self::UnknownTarget { id }
    }
}
