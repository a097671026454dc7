//! Graph and execution error types.

use graft_core::NodeId;
use thiserror::Error;

/// Errors raised by graph operations and plan execution.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("No node with id {id}")]
    UnknownNode { id: NodeId },

    #[error("Unknown node type: {name}")]
    UnknownType { name: String },

    #[error("Node {parent} has no child named '{name}'")]
    NoSuchChild { parent: NodeId, name: String },

    #[error("Identifier '{identifier}' is already registered")]
    DuplicateIdentifier { identifier: String },
}

impl GraphError {
    pub fn unknown_node(id: NodeId) -> Self {
        Self::UnknownNode { id }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn no_such_child(parent: NodeId, name: impl Into<String>) -> Self {
        Self::NoSuchChild {
            parent,
            name: name.into(),
        }
    }

    pub fn duplicate_identifier(identifier: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            identifier: identifier.into(),
        }
    }
}
