//! Planning error types.

use thiserror::Error;

/// Structural and constraint violations captured during planning.
/// None of these are fatal; the offending child is skipped.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Child node needs a 'type' to be created")]
    MissingType,

    #[error("Unknown node type: {name}")]
    UnknownType { name: String },

    #[error("Cannot create node of abstract type: {name}")]
    AbstractType { name: String },

    #[error("Type {child_type} is not allowed below type {parent_type}")]
    ChildTypeNotAllowed {
        child_type: String,
        parent_type: String,
    },

    #[error("Type {child_type} is not allowed in slot '{slot}' of type {declaring_type}")]
    GrandchildTypeNotAllowed {
        child_type: String,
        slot: String,
        declaring_type: String,
    },

    #[error("Auto-created child '{slot}' has a fixed type; 'type' ({attempted_type}) is ignored")]
    RetypedTetheredSlot {
        slot: String,
        attempted_type: String,
    },
}

impl PlanError {
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::AbstractType { name: name.into() }
    }

    pub fn child_type_not_allowed(
        child_type: impl Into<String>,
        parent_type: impl Into<String>,
    ) -> Self {
        Self::ChildTypeNotAllowed {
            child_type: child_type.into(),
            parent_type: parent_type.into(),
        }
    }

    pub fn grandchild_type_not_allowed(
        child_type: impl Into<String>,
        slot: impl Into<String>,
        declaring_type: impl Into<String>,
    ) -> Self {
        Self::GrandchildTypeNotAllowed {
            child_type: child_type.into(),
            slot: slot.into(),
            declaring_type: declaring_type.into(),
        }
    }

    pub fn retyped_tethered_slot(
        slot: impl Into<String>,
        attempted_type: impl Into<String>,
    ) -> Self {
        Self::RetypedTetheredSlot {
            slot: slot.into(),
            attempted_type: attempted_type.into(),
        }
    }
}
