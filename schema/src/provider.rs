//! The read-only schema seam.

use crate::TypeDef;

/// Read-only access to node-type declarations.
///
/// The provider is assumed fully initialized before the first lookup;
/// validation and planning never write through this interface.
pub trait SchemaProvider {
    /// Whether a type with this name is declared.
    fn has_type(&self, name: &str) -> bool;

    /// Get a type definition by name.
    fn get_type(&self, name: &str) -> Option<&TypeDef>;
}
