//! The SchemaValidator.

use crate::properties::validate_properties;
use crate::references::validate_references;
use crate::PropertyConverter;
pub use crate::references::ReferenceValue;
use graft_core::{ContentGraphLookup, ErrorSink, Value};
use graft_schema::TypeDef;
use indexmap::IndexMap;

/// The accepted subset of a template level's properties and references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedProperties {
    /// Accepted plain properties.
    pub properties: IndexMap<String, Value>,
    /// Accepted, resolved references.
    pub references: IndexMap<String, ReferenceValue>,
}

impl ValidatedProperties {
    /// Returns true if nothing survived validation.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.references.is_empty()
    }
}

/// Validates evaluated template properties against a type's schema.
///
/// Names declared as references on the type go through reference
/// resolution; everything else goes through property kind matching.
pub struct SchemaValidator<'c> {
    converter: &'c dyn PropertyConverter,
}

impl<'c> SchemaValidator<'c> {
    /// Create a validator with the given class-kind converter.
    pub fn new(converter: &'c dyn PropertyConverter) -> Self {
        Self { converter }
    }

    /// Validate one template level's property map against a type.
    pub fn validate(
        &self,
        properties: &IndexMap<String, Value>,
        type_def: &TypeDef,
        lookup: &dyn ContentGraphLookup,
        sink: &mut ErrorSink,
    ) -> ValidatedProperties {
        ValidatedProperties {
            properties: validate_properties(properties, type_def, self.converter, sink),
            references: validate_references(properties, type_def, lookup, sink),
        }
    }
}
