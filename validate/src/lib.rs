//! Graft Validation
//!
//! Validates an evaluated template's properties and references against the
//! target type's schema.
//!
//! Responsibilities:
//! - Reject reserved internal property names (fixed denylist)
//! - Match property values against declared kinds, including `array<T>`
//!   element checks and ISO-8601 date shapes
//! - Route class-like declared kinds through the injected PropertyConverter
//! - Resolve references (single and multiple) against the content graph
//!
//! Every rejection is captured into the sink and non-fatal: the owning node
//! is still created with whatever subset validated successfully.

mod converter;
mod error;
mod properties;
mod references;
mod validator;

pub use converter::*;
pub use error::*;
pub use validator::*;
