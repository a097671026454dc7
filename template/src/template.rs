//! Evaluated template descriptors.
//!
//! Templates are immutable once built: the evaluator produces them, the
//! validator and planner consume them, nothing mutates them in between.

use graft_core::Value;
use indexmap::IndexMap;

/// An evaluated descriptor for one prospective node.
///
/// The property map holds scalars, plus expression-produced lists and node
/// references destined for `array<T>` properties and multi-valued
/// references. Raw array/object literals and map-valued expression results
/// never get here; the evaluator rejects them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    /// Evaluated node type name, if declared.
    pub type_name: Option<String>,
    /// Evaluated node name, if declared.
    pub name: Option<String>,
    /// Evaluated property values, in declaration order.
    pub properties: IndexMap<String, Value>,
    /// Evaluated child templates, in declaration-then-iteration order.
    pub children: Vec<Template>,
}

/// The evaluated root descriptor. The root describes mutations on the
/// already-existing node the template is attached to, so it never carries a
/// type or name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootTemplate {
    /// Evaluated property values for the existing node.
    pub properties: IndexMap<String, Value>,
    /// Evaluated child templates.
    pub children: Vec<Template>,
}

impl RootTemplate {
    /// A root template with no properties and no children (produced when a
    /// root-level `when` is falsy or evaluation aborted structurally).
    pub fn empty() -> Self {
        Self::default()
    }
}
