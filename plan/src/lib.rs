//! Graft Planning
//!
//! Turns a validated template tree into an ordered, composable plan of
//! deferred node mutations. Nothing in this crate touches a content graph;
//! the plan is plain data that an executor interprets later.
//!
//! # Module Structure
//!
//! - `op` - MutationOp / MutationPlan, the deferred operation model
//! - `transient` - TransientNode, the structural planning cursor
//! - `planner` - MaterializationPlanner, the recursive tree walk
//! - `error` - constraint violation error types

mod error;
mod op;
mod planner;
mod transient;

pub use error::*;
pub use op::*;
pub use planner::*;
pub use transient::*;
