//! Graft Content Graph
//!
//! An in-memory content graph plus the executor that interprets a
//! [`graft_plan::MutationPlan`] against it.
//!
//! The graph is a tree of typed, named nodes. Creating a node auto-creates
//! its type's tethered slots, so a freshly created node already has the
//! structure its schema promises.

mod error;
mod executor;
mod graph;
mod node;

pub use error::*;
pub use executor::*;
pub use graph::*;
pub use node::*;
