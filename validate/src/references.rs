//! Reference validation and resolution.

use crate::{ValidationError, ValidationResult};
use graft_core::{ContentGraphLookup, ErrorSink, NodeId, Value};
use graft_schema::{ReferenceArity, TypeDef};
use indexmap::IndexMap;

/// A resolved reference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceValue {
    /// Points at one node.
    Single(NodeId),
    /// Points at an ordered list of nodes.
    Multiple(Vec<NodeId>),
}

impl ReferenceValue {
    /// The referenced node identities, in order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        match self {
            ReferenceValue::Single(id) => vec![*id],
            ReferenceValue::Multiple(ids) => ids.clone(),
        }
    }
}

/// Validate every declared reference present in a template level's property
/// map. Null values are silently skipped (no reference set); resolution
/// failures are captured and drop the reference. A multiple reference is
/// all-or-nothing: one failed lookup rejects the whole list.
pub(crate) fn validate_references(
    properties: &IndexMap<String, Value>,
    type_def: &TypeDef,
    lookup: &dyn ContentGraphLookup,
    sink: &mut ErrorSink,
) -> IndexMap<String, ReferenceValue> {
    let mut accepted = IndexMap::new();
    for (name, value) in properties {
        let Some(arity) = type_def.reference_arity(name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let origin = format!("Reference {} in type {}", name, type_def.name);
        let resolved = match arity {
            ReferenceArity::Single => {
                resolve_one(name, value, lookup).map(ReferenceValue::Single)
            }
            ReferenceArity::Multiple => {
                resolve_all(name, value, lookup).map(ReferenceValue::Multiple)
            }
        };
        match resolved {
            Ok(reference) => {
                accepted.insert(name.clone(), reference);
            }
            Err(error) => sink.capture(error, origin),
        }
    }
    accepted
}

fn resolve_one(
    name: &str,
    value: &Value,
    lookup: &dyn ContentGraphLookup,
) -> ValidationResult<NodeId> {
    match value {
        Value::NodeRef(id) => Ok(*id),
        Value::String(identifier) => lookup
            .find_by_identifier(identifier)
            .ok_or_else(|| ValidationError::reference_not_found(name, identifier)),
        other => Err(ValidationError::invalid_reference_value(
            name,
            other.type_name(),
        )),
    }
}

fn resolve_all(
    name: &str,
    value: &Value,
    lookup: &dyn ContentGraphLookup,
) -> ValidationResult<Vec<NodeId>> {
    // A bare node or identifier counts as a one-element list.
    let elements = match value {
        Value::List(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    elements
        .iter()
        .map(|element| resolve_one(name, element, lookup))
        .collect()
}
