//! The Schema - immutable type lookup.

use crate::{SchemaProvider, TypeDef};
use indexmap::IndexMap;

/// Immutable collection of node type definitions.
/// Constructed via `SchemaBuilder`, read-only afterwards.
#[derive(Debug)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
}

impl Schema {
    pub(crate) fn new(types: IndexMap<String, TypeDef>) -> Self {
        Self { types }
    }

    /// Number of declared types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All type definitions, in declaration order.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }
}

impl SchemaProvider for Schema {
    fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }
}
