//! Graft Expressions
//!
//! The embedded expression language used inside template configuration.
//! Strings shaped like `${...}` are expressions; everything else passes
//! through the pipeline as a literal.
//!
//! # Module Structure
//!
//! - `context` - EvaluationContext, the immutable variable scope
//! - `lexer` - tokenizer for expression source
//! - `ast` / `parser` - recursive-descent parser producing the Expr tree
//! - `eval` - the Evaluator and the ExpressionEvaluator seam
//! - `error` - expression error types

mod ast;
mod context;
mod error;
mod eval;
mod lexer;
mod parser;

pub use ast::*;
pub use context::*;
pub use error::*;
pub use eval::*;
