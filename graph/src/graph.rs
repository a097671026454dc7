//! The in-memory content graph.

use crate::{ContentNode, GraphError};
use graft_core::{normalize_name, ContentGraphLookup, NodeId};
use graft_schema::SchemaProvider;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::trace;

/// Auto-created slots are created recursively; schemas with slot cycles
/// stop expanding at this depth.
const MAX_TETHER_DEPTH: usize = 8;

/// A tree of typed, named content nodes.
///
/// Node names are normalized and unique among siblings. Creating a node
/// also creates the tethered slots its type declares.
#[derive(Debug, Default)]
pub struct ContentGraph {
    nodes: IndexMap<NodeId, ContentNode>,
    identifiers: HashMap<String, NodeId>,
    root: Option<NodeId>,
    next_id: u64,
}

impl ContentGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root node. Replaces any previous root.
    pub fn create_root(
        &mut self,
        schema: &dyn SchemaProvider,
        type_name: &str,
    ) -> Result<NodeId, GraphError> {
        if !schema.has_type(type_name) {
            return Err(GraphError::unknown_type(type_name));
        }
        let id = self.allocate(type_name, "", None);
        self.root = Some(id);
        self.create_tethered_slots(schema, id, 0)?;
        Ok(id)
    }

    /// Create a child node under `parent`. The name is normalized and made
    /// unique among the parent's children.
    pub fn create_child(
        &mut self,
        schema: &dyn SchemaProvider,
        parent: NodeId,
        type_name: &str,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if !schema.has_type(type_name) {
            return Err(GraphError::unknown_type(type_name));
        }
        if !self.nodes.contains_key(&parent) {
            return Err(GraphError::unknown_node(parent));
        }

        let base = match name {
            Some(name) => normalize_name(name),
            None => normalize_name(type_name),
        };
        let name = self.unique_child_name(parent, &base);
        trace!(%parent, type_name, name, "creating child node");

        let id = self.allocate(type_name, &name, Some(parent));
        self.nodes[&parent].children.push(id);
        self.create_tethered_slots(schema, id, 0)?;
        Ok(id)
    }

    /// Every slot the node's type declares, created up front.
    fn create_tethered_slots(
        &mut self,
        schema: &dyn SchemaProvider,
        id: NodeId,
        depth: usize,
    ) -> Result<(), GraphError> {
        if depth >= MAX_TETHER_DEPTH {
            return Ok(());
        }
        let type_name = self.nodes[&id].type_name.clone();
        let Some(def) = schema.get_type(&type_name) else {
            return Err(GraphError::unknown_type(type_name));
        };
        let slots: Vec<_> = def
            .tethered
            .values()
            .map(|slot| (slot.name.clone(), slot.child_type.clone()))
            .collect();

        for (slot_name, child_type) in slots {
            let child = self.allocate(&child_type, &slot_name, Some(id));
            self.nodes[&id].children.push(child);
            self.create_tethered_slots(schema, child, depth + 1)?;
        }
        Ok(())
    }

    fn allocate(&mut self, type_name: &str, name: &str, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId::new(self.next_id);
        self.nodes
            .insert(id, ContentNode::new(id, type_name, name, parent));
        id
    }

    fn unique_child_name(&self, parent: NodeId, base: &str) -> String {
        let taken = |candidate: &str| self.child_by_name(parent, candidate).is_some();
        if !taken(base) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base}-{counter}");
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// The root node id, if a root exists.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&ContentNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut ContentNode> {
        self.nodes.get_mut(&id)
    }

    /// Find a direct child by normalized name.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let parent = self.nodes.get(&parent)?;
        parent
            .children
            .iter()
            .copied()
            .find(|id| self.nodes[id].name == name)
    }

    /// Register an external identifier (used by reference resolution).
    pub fn register_identifier(
        &mut self,
        identifier: impl Into<String>,
        id: NodeId,
    ) -> Result<(), GraphError> {
        let identifier = identifier.into();
        if self.identifiers.contains_key(&identifier) {
            return Err(GraphError::duplicate_identifier(identifier));
        }
        self.identifiers.insert(identifier, id);
        Ok(())
    }

    /// Absolute path of a node: "/" for the root, "/a/b" below it.
    pub fn path(&self, id: NodeId) -> Option<String> {
        let mut segments = Vec::new();
        let mut cursor = self.nodes.get(&id)?;
        while let Some(parent) = cursor.parent {
            segments.push(cursor.name.clone());
            cursor = self.nodes.get(&parent)?;
        }
        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }

    fn resolve_path(&self, path: &str) -> Option<NodeId> {
        let mut cursor = self.root?;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            cursor = self.child_by_name(cursor, segment)?;
        }
        Some(cursor)
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ContentGraphLookup for ContentGraph {
    /// Identifiers are either registered aliases or absolute paths.
    fn find_by_identifier(&self, identifier: &str) -> Option<NodeId> {
        if let Some(id) = self.identifiers.get(identifier) {
            return Some(*id);
        }
        if identifier.starts_with('/') {
            return self.resolve_path(identifier);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_schema::{Schema, SchemaBuilder};

    fn schema() -> Schema {
        let mut builder = SchemaBuilder::new();
        builder
            .add_type("Page")
            .tethered("header", "Header")
            .allow_any_child()
            .done()
            .unwrap();
        builder.add_type("Header").done().unwrap();
        builder.add_type("Text").done().unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_create_root_auto_creates_tethered_slots() {
        // GIVEN
        let schema = schema();
        let mut graph = ContentGraph::new();

        // WHEN
        let root = graph.create_root(&schema, "Page").unwrap();

        // THEN
        let header = graph.child_by_name(root, "header").unwrap();
        assert_eq!(graph.node(header).unwrap().type_name, "Header");
        assert_eq!(graph.path(header).unwrap(), "/header");
    }

    #[test]
    fn test_sibling_names_are_made_unique() {
        // GIVEN
        let schema = schema();
        let mut graph = ContentGraph::new();
        let root = graph.create_root(&schema, "Page").unwrap();

        // WHEN
        let a = graph.create_child(&schema, root, "Text", Some("Body")).unwrap();
        let b = graph.create_child(&schema, root, "Text", Some("Body")).unwrap();
        let c = graph.create_child(&schema, root, "Text", None).unwrap();

        // THEN
        assert_eq!(graph.node(a).unwrap().name, "body");
        assert_eq!(graph.node(b).unwrap().name, "body-2");
        assert_eq!(graph.node(c).unwrap().name, "text");
    }

    #[test]
    fn test_lookup_by_alias_and_path() {
        // GIVEN
        let schema = schema();
        let mut graph = ContentGraph::new();
        let root = graph.create_root(&schema, "Page").unwrap();
        let body = graph.create_child(&schema, root, "Text", Some("body")).unwrap();
        graph.register_identifier("the-body", body).unwrap();

        // THEN
        assert_eq!(graph.find_by_identifier("the-body"), Some(body));
        assert_eq!(graph.find_by_identifier("/body"), Some(body));
        assert_eq!(graph.find_by_identifier("/"), Some(root));
        assert_eq!(graph.find_by_identifier("/missing"), None);
        assert_eq!(graph.find_by_identifier("unregistered"), None);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let schema = schema();
        let mut graph = ContentGraph::new();
        let root = graph.create_root(&schema, "Page").unwrap();
        let result = graph.create_child(&schema, root, "Nope", None);
        assert!(matches!(result, Err(GraphError::UnknownType { .. })));
    }
}
