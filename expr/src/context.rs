//! Variable scope for expression evaluation.
//!
//! Contexts are immutable-with-copy: extending a context for a deeper
//! template level clones the map and appends, so sibling branches never see
//! each other's variables.

use graft_core::Value;
use indexmap::IndexMap;

/// An evaluation context: an ordered map of variable name to value.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    vars: IndexMap<String, Value>,
}

impl EvaluationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from seed variables.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// A copy of this context with one extra (or overridden) variable.
    pub fn with_var(&self, name: impl Into<String>, value: Value) -> Self {
        let mut vars = self.vars.clone();
        vars.insert(name.into(), value);
        Self { vars }
    }

    /// A copy of this context extended with several variables at once.
    /// Later entries override earlier ones and the base context.
    pub fn extended(&self, entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut vars = self.vars.clone();
        for (name, value) in entries {
            vars.insert(name, value);
        }
        Self { vars }
    }

    /// Names of all bound variables, in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}
