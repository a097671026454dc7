//! Graft Schema
//!
//! Node-type schema declarations and lookup:
//! - Property kinds and reference arity (`kind`)
//! - Type definitions with tethered slots and child constraints (`types`)
//! - The read-only `SchemaProvider` seam consumed by validation and planning
//! - An immutable in-memory `Schema` built via `SchemaBuilder`
//!
//! The schema is fully initialized before any lookup happens; there is no
//! lazy warming and no interior mutability.

mod builder;
mod kind;
mod provider;
mod schema;
mod types;

pub use builder::*;
pub use kind::*;
pub use provider::*;
pub use schema::*;
pub use types::*;
