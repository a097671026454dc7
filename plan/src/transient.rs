//! The planning cursor.

/// Where a node inside a tethered slot came from. Constraints for children
/// of a slot are declared on the slot's *declaring* type (the grandparent),
/// not on the slot's own type, so the planner has to remember both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TetheredOrigin {
    /// Normalized slot name.
    pub slot_name: String,
    /// The type that declares the slot.
    pub declaring_type: String,
}

/// A structural cursor used only during planning: the schema-level type of
/// a prospective node, plus its tethered origin when it is an auto-created
/// slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientNode {
    /// Type of the prospective node.
    pub type_name: String,
    /// Set when this cursor is an auto-created slot.
    pub tethered: Option<TetheredOrigin>,
}

impl TransientNode {
    /// Cursor for a regular (created or pre-existing) node.
    pub fn regular(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            tethered: None,
        }
    }

    /// Cursor for an auto-created slot.
    pub fn tethered(
        type_name: impl Into<String>,
        slot_name: impl Into<String>,
        declaring_type: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            tethered: Some(TetheredOrigin {
                slot_name: slot_name.into(),
                declaring_type: declaring_type.into(),
            }),
        }
    }
}
