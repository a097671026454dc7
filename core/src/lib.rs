//! Graft Core Types
//!
//! This crate provides the foundational types used throughout the graft
//! pipeline:
//! - Identity types (NodeId)
//! - Value types (the Value enum with all scalar and structured kinds)
//! - Node name normalization and slug derivation
//! - The error sink (CapturedError, ErrorSink)
//! - The ContentGraphLookup seam for reference resolution

mod id;
mod lookup;
mod name;
mod sink;
mod value;

pub use id::*;
pub use lookup::*;
pub use name::*;
pub use sink::*;
pub use value::*;
