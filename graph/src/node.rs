//! Content nodes.

use graft_core::{NodeId, Value};
use indexmap::IndexMap;

/// One node in the content graph.
#[derive(Debug, Clone)]
pub struct ContentNode {
    /// Unique node id.
    pub id: NodeId,
    /// Schema type of the node.
    pub type_name: String,
    /// Normalized node name, unique among its siblings.
    pub name: String,
    /// Plain property values.
    pub properties: IndexMap<String, Value>,
    /// Resolved reference targets, keyed by reference name.
    pub references: IndexMap<String, Vec<NodeId>>,
    /// Child ids, in creation order.
    pub children: Vec<NodeId>,
    /// Parent id; `None` for the root.
    pub parent: Option<NodeId>,
}

impl ContentNode {
    pub(crate) fn new(
        id: NodeId,
        type_name: impl Into<String>,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            name: name.into(),
            properties: IndexMap::new(),
            references: IndexMap::new(),
            children: Vec::new(),
            parent,
        }
    }

    /// A property value, if set.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Resolved targets of a reference, if set.
    pub fn reference(&self, name: &str) -> Option<&[NodeId]> {
        self.references.get(name).map(Vec::as_slice)
    }
}
