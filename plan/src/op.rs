//! The deferred mutation model.
//!
//! A plan is an ordered list of operations interpreted against a cursor
//! into the content graph. `Isolated` sub-plans scope both the cursor and
//! failure: an operation failing inside an isolated frame abandons that
//! frame only, and the cursor snaps back to where it was before the frame.

use graft_core::Value;
use graft_validate::ReferenceValue;
use indexmap::IndexMap;

/// One deferred mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOp {
    /// Set plain properties on the cursor node.
    SetProperties {
        properties: IndexMap<String, Value>,
    },
    /// Set resolved references on the cursor node.
    SetReferences {
        references: IndexMap<String, ReferenceValue>,
    },
    /// Move the cursor to an existing child, matched by normalized name.
    SelectChild { name: String },
    /// Create a child under the cursor node and move the cursor to it.
    CreateAndSelectChild {
        type_name: String,
        name: Option<String>,
    },
    /// Run a sub-plan with its own cursor scope and failure boundary.
    Isolated { plan: MutationPlan },
}

/// An ordered sequence of deferred mutations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationPlan {
    ops: Vec<MutationOp>,
}

impl MutationPlan {
    /// An empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one operation.
    pub fn push(&mut self, op: MutationOp) {
        self.ops.push(op);
    }

    /// Returns true when the plan carries no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of top-level operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// The operations, in execution order.
    pub fn ops(&self) -> &[MutationOp] {
        &self.ops
    }

    /// Consume the plan into its operations.
    pub fn into_ops(self) -> Vec<MutationOp> {
        self.ops
    }
}

impl FromIterator<MutationOp> for MutationPlan {
    fn from_iter<I: IntoIterator<Item = MutationOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MutationPlan {
    type Item = MutationOp;
    type IntoIter = std::vec::IntoIter<MutationOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
