//! Graft Materialization
//!
//! The orchestrator: wires the template evaluator, the materialization
//! planner (which validates per node) and the plan executor against a live
//! content graph node, applies the error policy at the post-evaluation
//! checkpoint, and renders a user-facing report.

mod error;
mod materializer;
mod policy;
mod report;

pub use error::*;
pub use materializer::*;
pub use policy::*;
pub use report::*;
