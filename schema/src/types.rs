//! Node type definitions.

use crate::{PropertyKind, ReferenceArity, TypeKind};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Which child types a position admits.
#[derive(Debug, Clone, Default)]
pub struct ChildConstraints {
    /// Explicitly permitted type names.
    allowed: HashSet<String>,
    /// When set, every type is permitted regardless of `allowed`.
    allow_all: bool,
}

impl ChildConstraints {
    /// Constraints that admit every type.
    pub fn any() -> Self {
        Self {
            allowed: HashSet::new(),
            allow_all: true,
        }
    }

    /// Constraints that admit exactly the given types.
    pub fn only(types: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: types.into_iter().collect(),
            allow_all: false,
        }
    }

    /// Permit one more type.
    pub fn allow(&mut self, type_name: impl Into<String>) {
        self.allowed.insert(type_name.into());
    }

    /// Check whether a type is permitted.
    pub fn permits(&self, type_name: &str) -> bool {
        self.allow_all || self.allowed.contains(type_name)
    }
}

/// Declaration of an auto-created ("tethered") child slot.
#[derive(Debug, Clone)]
pub struct TetheredSlot {
    /// Normalized slot name.
    pub name: String,
    /// Type of the auto-created child. Fixed by the schema; templates may
    /// never re-type a slot.
    pub child_type: String,
}

/// A node type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Type name.
    pub name: String,
    /// Content vs. document classification.
    pub kind: TypeKind,
    /// Whether this type is abstract (cannot be instantiated directly).
    pub is_abstract: bool,
    /// Declared properties, in declaration order.
    pub properties: IndexMap<String, PropertyKind>,
    /// Declared references, in declaration order.
    pub references: IndexMap<String, ReferenceArity>,
    /// Auto-created child slots, keyed by normalized slot name.
    pub tethered: IndexMap<String, TetheredSlot>,
    /// Which types may be created directly under this type.
    pub child_constraints: ChildConstraints,
    /// Per-slot constraints for grandchildren created inside a tethered
    /// slot. Declared here (on the grandparent), not on the slot's own type.
    pub grandchild_constraints: IndexMap<String, ChildConstraints>,
}

impl TypeDef {
    /// Create an empty type definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Content,
            is_abstract: false,
            properties: IndexMap::new(),
            references: IndexMap::new(),
            tethered: IndexMap::new(),
            child_constraints: ChildConstraints::default(),
            grandchild_constraints: IndexMap::new(),
        }
    }

    /// Declared kind of a property, if the property exists.
    pub fn property_kind(&self, name: &str) -> Option<&PropertyKind> {
        self.properties.get(name)
    }

    /// Declared arity of a reference, if the reference exists.
    pub fn reference_arity(&self, name: &str) -> Option<ReferenceArity> {
        self.references.get(name).copied()
    }

    /// Look up a tethered slot by normalized name.
    pub fn tethered_slot(&self, normalized_name: &str) -> Option<&TetheredSlot> {
        self.tethered.get(normalized_name)
    }

    /// Whether a type may be created directly under this type.
    pub fn allows_child_type(&self, type_name: &str) -> bool {
        self.child_constraints.permits(type_name)
    }

    /// Whether a type may be created inside the named tethered slot.
    /// Falls back to no per-slot declaration = nothing declared here; the
    /// caller decides the fallback (the planner falls back to the slot
    /// type's own child constraints).
    pub fn grandchild_constraints_for(&self, slot_name: &str) -> Option<&ChildConstraints> {
        self.grandchild_constraints.get(slot_name)
    }

    /// Returns true for document-kind types.
    pub fn is_document(&self) -> bool {
        self.kind == TypeKind::Document
    }
}
