//! Graft Template
//!
//! Turns raw declarative configuration into an immutable template tree.
//!
//! # Module Structure
//!
//! - `config` - RawConfiguration, the closed seven-field structure, plus the
//!   YAML front door
//! - `template` - Template / RootTemplate, the evaluated descriptors
//! - `evaluator` - TemplateEvaluator, the recursive interpreter handling
//!   `withContext`, `when`, `withItems`, properties and child nodes
//! - `error` - template error types

mod config;
mod error;
mod evaluator;
mod template;

pub use config::*;
pub use error::*;
pub use evaluator::*;
pub use template::*;
