//! Property validation against declared kinds.

use crate::{PropertyConverter, ValidationError};
use graft_core::{ErrorSink, Value};
use graft_schema::{PropertyKind, TypeDef};
use indexmap::IndexMap;
use regex_lite::Regex;
use std::sync::OnceLock;

/// Reserved internal property names, matched case-insensitively. These are
/// owned by the content repository and can never be set from a template.
const RESERVED_INTERNAL_PROPERTIES: &[&str] = &[
    "_index",
    "_name",
    "_nodetype",
    "_path",
    "_removed",
    "_hidden",
    "_creationdatetime",
    "_lastmodificationdatetime",
    "_lastpublicationdatetime",
];

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Date, optionally followed by a time and zone designator.
        Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}(:\d{2})?(Z|[+-]\d{2}:\d{2})?)?$")
            .unwrap_or_else(|_| unreachable!("date pattern is a valid regex"))
    })
}

pub(crate) fn is_reserved(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    RESERVED_INTERNAL_PROPERTIES.contains(&lowered.as_str())
}

/// Validate every non-reference property of a template level, producing the
/// accepted subset. Rejections are captured and skipped.
pub(crate) fn validate_properties(
    properties: &IndexMap<String, Value>,
    type_def: &TypeDef,
    converter: &dyn PropertyConverter,
    sink: &mut ErrorSink,
) -> IndexMap<String, Value> {
    let mut accepted = IndexMap::new();
    for (name, value) in properties {
        // Reference-declared names are handled by reference validation.
        if type_def.reference_arity(name).is_some() {
            continue;
        }

        let origin = property_origin(name, type_def);

        if is_reserved(name) {
            sink.capture(ValidationError::reserved_property(name), origin);
            continue;
        }

        let Some(kind) = type_def.property_kind(name) else {
            sink.capture(
                ValidationError::undeclared_property(name, &type_def.name),
                origin,
            );
            continue;
        };

        // Explicit null always matches: it overrides defaults.
        if value.is_null() {
            accepted.insert(name.clone(), Value::Null);
            continue;
        }

        match kind {
            PropertyKind::Class(class_name) => match converter.convert(value, class_name) {
                Ok(converted) => {
                    accepted.insert(name.clone(), converted);
                }
                Err(message) => {
                    sink.capture(
                        ValidationError::conversion_failed(name, class_name, message),
                        origin,
                    );
                }
            },
            kind if matches_kind(value, kind) => {
                accepted.insert(name.clone(), value.clone());
            }
            kind => {
                sink.capture(
                    ValidationError::kind_mismatch(name, kind.to_string(), value.type_name()),
                    origin,
                );
            }
        }
    }
    accepted
}

pub(crate) fn property_origin(name: &str, type_def: &TypeDef) -> String {
    format!("Property {} in type {}", name, type_def.name)
}

/// Structural match of a value against a declared primitive kind.
/// Class kinds never match structurally; they go through conversion.
fn matches_kind(value: &Value, kind: &PropertyKind) -> bool {
    match kind {
        PropertyKind::Boolean => matches!(value, Value::Bool(_)),
        PropertyKind::Integer => matches!(value, Value::Int(_)),
        // Integers are acceptable wherever a float is declared.
        PropertyKind::Float => matches!(value, Value::Float(_) | Value::Int(_)),
        PropertyKind::String => matches!(value, Value::String(_)),
        PropertyKind::Date => value
            .as_str()
            .is_some_and(|s| date_pattern().is_match(s)),
        PropertyKind::Array(None) => matches!(value, Value::List(_)),
        PropertyKind::Array(Some(elem)) => value
            .as_list()
            .is_some_and(|items| items.iter().all(|item| matches_kind(item, elem))),
        PropertyKind::Class(_) => false,
    }
}
