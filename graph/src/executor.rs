//! The plan executor.

use crate::{ContentGraph, GraphError};
use graft_core::{CapturedError, ErrorSink, NodeId};
use graft_plan::{MutationOp, MutationPlan};
use graft_schema::SchemaProvider;
use graft_validate::ReferenceValue;
use tracing::{debug, trace};

/// Interprets a [`MutationPlan`] against a content graph.
///
/// Operations run against a cursor node. An `Isolated` sub-plan runs with
/// its own cursor copy and its own failure boundary: when an operation
/// inside the frame fails, the failure is captured, the rest of the frame
/// is abandoned, and execution resumes after the frame.
pub struct PlanExecutor<'a> {
    schema: &'a dyn SchemaProvider,
    graph: &'a mut ContentGraph,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(schema: &'a dyn SchemaProvider, graph: &'a mut ContentGraph) -> Self {
        Self { schema, graph }
    }

    /// Execute a plan with the cursor starting at `target`. Returns the
    /// number of operations applied (isolated frames count as one).
    pub fn execute(
        &mut self,
        plan: &MutationPlan,
        target: NodeId,
        sink: &mut ErrorSink,
    ) -> usize {
        let mut applied = 0;
        let mut cursor = target;
        for op in plan.ops() {
            match self.apply(op, &mut cursor, sink) {
                Ok(()) => applied += 1,
                Err(error) => {
                    // A top-level failure abandons the remaining plan; the
                    // planner wraps per-child work in isolated frames, so
                    // this only drops mutations on the already-broken
                    // cursor.
                    debug!(%error, "plan execution stopped");
                    sink.push(CapturedError::new(error));
                    break;
                }
            }
        }
        applied
    }

    fn apply(
        &mut self,
        op: &MutationOp,
        cursor: &mut NodeId,
        sink: &mut ErrorSink,
    ) -> Result<(), GraphError> {
        match op {
            MutationOp::SetProperties { properties } => {
                let node = self
                    .graph
                    .node_mut(*cursor)
                    .ok_or(GraphError::unknown_node(*cursor))?;
                for (name, value) in properties {
                    node.properties.insert(name.clone(), value.clone());
                }
                Ok(())
            }
            MutationOp::SetReferences { references } => {
                let node = self
                    .graph
                    .node_mut(*cursor)
                    .ok_or(GraphError::unknown_node(*cursor))?;
                for (name, value) in references {
                    node.references.insert(name.clone(), value.node_ids());
                }
                Ok(())
            }
            MutationOp::SelectChild { name } => {
                let child = self
                    .graph
                    .child_by_name(*cursor, name)
                    .ok_or_else(|| GraphError::no_such_child(*cursor, name))?;
                *cursor = child;
                Ok(())
            }
            MutationOp::CreateAndSelectChild { type_name, name } => {
                *cursor = self.get_or_create_child(*cursor, type_name, name.as_deref())?;
                Ok(())
            }
            MutationOp::Isolated { plan } => {
                // Own cursor copy; the outer cursor is untouched either way.
                let mut inner = *cursor;
                for op in plan.ops() {
                    if let Err(error) = self.apply(op, &mut inner, sink) {
                        trace!(%error, "isolated frame abandoned");
                        sink.push(CapturedError::new(error));
                        break;
                    }
                }
                Ok(())
            }
        }
    }

    /// Named creations are get-or-create: an existing child with the same
    /// name and type is reused, which makes re-applying a plan idempotent.
    fn get_or_create_child(
        &mut self,
        parent: NodeId,
        type_name: &str,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if let Some(name) = name {
            if let Some(existing) = self.graph.child_by_name(parent, name) {
                if self
                    .graph
                    .node(existing)
                    .is_some_and(|node| node.type_name == type_name)
                {
                    return Ok(existing);
                }
            }
        }
        self.graph.create_child(self.schema, parent, type_name, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::Value;
    use graft_schema::{Schema, SchemaBuilder};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

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

    fn set_title(title: &str) -> MutationOp {
        let mut properties = IndexMap::new();
        properties.insert("title".to_string(), Value::String(title.into()));
        MutationOp::SetProperties { properties }
    }

    #[test]
    fn test_create_select_and_set() {
        // GIVEN
        let schema = schema();
        let mut graph = ContentGraph::new();
        let root = graph.create_root(&schema, "Page").unwrap();

        let mut frame = MutationPlan::new();
        frame.push(MutationOp::CreateAndSelectChild {
            type_name: "Text".into(),
            name: Some("intro".into()),
        });
        frame.push(set_title("Hello"));
        let mut plan = MutationPlan::new();
        plan.push(MutationOp::Isolated { plan: frame });

        let mut sink = ErrorSink::new();

        // WHEN
        let applied = PlanExecutor::new(&schema, &mut graph).execute(&plan, root, &mut sink);

        // THEN
        assert!(sink.is_empty());
        assert_eq!(applied, 1);
        let intro = graph.child_by_name(root, "intro").unwrap();
        assert_eq!(
            graph.node(intro).unwrap().property("title"),
            Some(&Value::String("Hello".into()))
        );
    }

    #[test]
    fn test_failed_frame_is_abandoned_but_siblings_run() {
        // GIVEN: first frame selects a child that does not exist, second
        // frame is valid.
        let schema = schema();
        let mut graph = ContentGraph::new();
        let root = graph.create_root(&schema, "Page").unwrap();

        let mut broken = MutationPlan::new();
        broken.push(MutationOp::SelectChild {
            name: "missing".into(),
        });
        broken.push(set_title("never applied"));

        let mut good = MutationPlan::new();
        good.push(MutationOp::SelectChild {
            name: "header".into(),
        });
        good.push(set_title("Applied"));

        let mut plan = MutationPlan::new();
        plan.push(MutationOp::Isolated { plan: broken });
        plan.push(MutationOp::Isolated { plan: good });

        let mut sink = ErrorSink::new();

        // WHEN
        let applied = PlanExecutor::new(&schema, &mut graph).execute(&plan, root, &mut sink);

        // THEN: the failure is captured, the sibling frame still applied.
        assert_eq!(applied, 2);
        assert_eq!(sink.len(), 1);
        assert!(sink.errors()[0].message.contains("no child named"));
        let header = graph.child_by_name(root, "header").unwrap();
        assert_eq!(
            graph.node(header).unwrap().property("title"),
            Some(&Value::String("Applied".into()))
        );
    }

    #[test]
    fn test_named_creation_is_idempotent() {
        // GIVEN
        let schema = schema();
        let mut graph = ContentGraph::new();
        let root = graph.create_root(&schema, "Page").unwrap();

        let mut frame = MutationPlan::new();
        frame.push(MutationOp::CreateAndSelectChild {
            type_name: "Text".into(),
            name: Some("intro".into()),
        });
        frame.push(set_title("Hello"));
        let mut plan = MutationPlan::new();
        plan.push(MutationOp::Isolated { plan: frame });

        let mut sink = ErrorSink::new();

        // WHEN: the same plan runs twice.
        PlanExecutor::new(&schema, &mut graph).execute(&plan, root, &mut sink);
        PlanExecutor::new(&schema, &mut graph).execute(&plan, root, &mut sink);

        // THEN: still one "intro" child (plus the tethered header).
        assert!(sink.is_empty());
        assert_eq!(graph.node(root).unwrap().children.len(), 2);
    }
}
