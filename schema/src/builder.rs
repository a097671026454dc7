//! SchemaBuilder for constructing an immutable Schema.

use crate::{
    ChildConstraints, PropertyKind, ReferenceArity, Schema, TetheredSlot, TypeDef, TypeKind,
};
use graft_core::normalize_name;
use indexmap::IndexMap;
use thiserror::Error;

/// Errors that can occur during schema construction.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Unknown type '{child_type}' in tethered slot '{slot}' of type '{type_name}'")]
    UnknownTetheredType {
        type_name: String,
        slot: String,
        child_type: String,
    },

    #[error("Grandchild constraints on '{type_name}' name unknown slot '{slot}'")]
    UnknownSlotInConstraint { type_name: String, slot: String },
}

/// Builder for constructing an immutable Schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: IndexMap<String, TypeDef>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder {
            builder: self,
            def: TypeDef::new(name),
        }
    }

    /// Build the immutable Schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        // Tethered slots must point at declared types, and grandchild
        // constraints must name declared slots.
        for type_def in self.types.values() {
            for slot in type_def.tethered.values() {
                if !self.types.contains_key(&slot.child_type) {
                    return Err(SchemaError::UnknownTetheredType {
                        type_name: type_def.name.clone(),
                        slot: slot.name.clone(),
                        child_type: slot.child_type.clone(),
                    });
                }
            }
            for slot_name in type_def.grandchild_constraints.keys() {
                if !type_def.tethered.contains_key(slot_name) {
                    return Err(SchemaError::UnknownSlotInConstraint {
                        type_name: type_def.name.clone(),
                        slot: slot_name.clone(),
                    });
                }
            }
        }

        Ok(Schema::new(self.types))
    }
}

/// Fluent builder for one type definition.
pub struct TypeBuilder<'b> {
    builder: &'b mut SchemaBuilder,
    def: TypeDef,
}

impl<'b> TypeBuilder<'b> {
    /// Mark the type abstract (cannot be instantiated).
    pub fn abstract_type(mut self) -> Self {
        self.def.is_abstract = true;
        self
    }

    /// Classify the type as a document.
    pub fn document(mut self) -> Self {
        self.def.kind = TypeKind::Document;
        self
    }

    /// Declare a property.
    pub fn property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.def.properties.insert(name.into(), kind);
        self
    }

    /// Declare a reference.
    pub fn reference(mut self, name: impl Into<String>, arity: ReferenceArity) -> Self {
        self.def.references.insert(name.into(), arity);
        self
    }

    /// Declare an auto-created child slot. Slot names are stored normalized.
    pub fn tethered(mut self, slot_name: &str, child_type: impl Into<String>) -> Self {
        let name = normalize_name(slot_name);
        self.def.tethered.insert(
            name.clone(),
            TetheredSlot {
                name,
                child_type: child_type.into(),
            },
        );
        self
    }

    /// Permit a type directly under this type.
    pub fn allow_child(mut self, type_name: impl Into<String>) -> Self {
        self.def.child_constraints.allow(type_name);
        self
    }

    /// Permit every type directly under this type.
    pub fn allow_any_child(mut self) -> Self {
        self.def.child_constraints = ChildConstraints::any();
        self
    }

    /// Permit a type inside the named tethered slot.
    pub fn allow_grandchild(mut self, slot_name: &str, type_name: impl Into<String>) -> Self {
        self.def
            .grandchild_constraints
            .entry(normalize_name(slot_name))
            .or_default()
            .allow(type_name);
        self
    }

    /// Commit the type definition to the schema.
    pub fn done(self) -> Result<(), SchemaError> {
        let name = self.def.name.clone();
        if self.builder.types.contains_key(&name) {
            return Err(SchemaError::DuplicateTypeName(name));
        }
        self.builder.types.insert(name, self.def);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaProvider;

    #[test]
    fn test_build_schema_with_tethered_slot() {
        // GIVEN
        let mut builder = SchemaBuilder::new();
        builder
            .add_type("Page")
            .document()
            .property("title", PropertyKind::String)
            .tethered("main", "ContentCollection")
            .allow_grandchild("main", "Text")
            .done()
            .unwrap();
        builder.add_type("ContentCollection").done().unwrap();
        builder.add_type("Text").done().unwrap();

        // WHEN
        let schema = builder.build().unwrap();

        // THEN
        let page = schema.get_type("Page").unwrap();
        assert!(page.is_document());
        let slot = page.tethered_slot("main").unwrap();
        assert_eq!(slot.child_type, "ContentCollection");
        assert!(page
            .grandchild_constraints_for("main")
            .unwrap()
            .permits("Text"));
    }

    #[test]
    fn test_duplicate_type_name_error() {
        // GIVEN
        let mut builder = SchemaBuilder::new();
        builder.add_type("Text").done().unwrap();

        // WHEN
        let result = builder.add_type("Text").done();

        // THEN
        assert!(matches!(result, Err(SchemaError::DuplicateTypeName(_))));
    }

    #[test]
    fn test_unknown_tethered_type_rejected() {
        // GIVEN
        let mut builder = SchemaBuilder::new();
        builder
            .add_type("Page")
            .tethered("main", "Missing")
            .done()
            .unwrap();

        // WHEN
        let result = builder.build();

        // THEN
        assert!(matches!(
            result,
            Err(SchemaError::UnknownTetheredType { .. })
        ));
    }

    #[test]
    fn test_get_type_not_found() {
        let schema = SchemaBuilder::new().build().unwrap();
        assert!(!schema.has_type("Nope"));
        assert!(schema.get_type("Nope").is_none());
    }
}
