//! Declared property kinds and reference arity.

use std::fmt;

/// The declared kind of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// Boolean.
    Boolean,
    /// 64-bit integer.
    Integer,
    /// 64-bit float (integers are accepted and promoted).
    Float,
    /// UTF-8 string.
    String,
    /// ISO-8601 date string (`YYYY-MM-DD`, optional time suffix).
    Date,
    /// List of values; the element kind is checked when declared.
    Array(Option<Box<PropertyKind>>),
    /// A class-like kind handled by an external converter.
    Class(String),
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Boolean => write!(f, "boolean"),
            PropertyKind::Integer => write!(f, "integer"),
            PropertyKind::Float => write!(f, "float"),
            PropertyKind::String => write!(f, "string"),
            PropertyKind::Date => write!(f, "date"),
            PropertyKind::Array(None) => write!(f, "array"),
            PropertyKind::Array(Some(elem)) => write!(f, "array<{}>", elem),
            PropertyKind::Class(name) => write!(f, "{}", name),
        }
    }
}

/// Declared arity of a reference property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceArity {
    /// Points at exactly one node.
    Single,
    /// Points at an ordered list of nodes.
    Multiple,
}

/// Coarse classification of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeKind {
    /// Plain content node.
    #[default]
    Content,
    /// Document node; documents get a derived slug when none is supplied.
    Document,
}
