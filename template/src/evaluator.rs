//! Template evaluation.
//!
//! Recursive descent over `RawConfiguration`, one level at a time:
//! 1. extend the context with `withContext` (entries see only the incoming
//!    context, never each other)
//! 2. test `when` against the extended context; falsy discards the level
//!    silently
//! 3. resolve `withItems`; a list or map fans the level out into one sibling
//!    per `(key, item)` pair
//! 4. evaluate properties, `type`, `name`, and recurse into child nodes
//!
//! Failures are captured into the sink with a dotted origin path and drop
//! only the subtree rooted at the failing path. Siblings are never affected.

use crate::config::join_path;
use crate::{RawConfiguration, RootTemplate, Template, TemplateError};
use graft_core::{ErrorSink, Value};
use graft_expr::{EvaluationContext, ExpressionEvaluator};
use indexmap::IndexMap;

/// Default recursion guard against self-referential configuration.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Interprets raw configuration into an immutable template tree.
pub struct TemplateEvaluator<'e> {
    expressions: &'e dyn ExpressionEvaluator,
    max_depth: usize,
}

impl<'e> TemplateEvaluator<'e> {
    /// Create an evaluator with the default recursion guard.
    pub fn new(expressions: &'e dyn ExpressionEvaluator) -> Self {
        Self {
            expressions,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the recursion guard.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluate a root configuration into a `RootTemplate`.
    pub fn evaluate(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        sink: &mut ErrorSink,
    ) -> RootTemplate {
        let context = match self.extended_context(config, context, "", sink) {
            Some(context) => context,
            None => return RootTemplate::empty(),
        };

        match self.when_passes(config, &context, "", sink) {
            Some(true) => {}
            // Falsy root condition or a failing condition expression: the
            // template contributes nothing.
            Some(false) | None => return RootTemplate::empty(),
        }

        let properties = self.evaluate_properties(config, &context, "", sink);
        let children = self.evaluate_children(config, &context, "", 0, sink);

        RootTemplate {
            properties,
            children,
        }
    }

    /// Evaluate one child configuration into zero or more sibling templates
    /// (`withItems` fans a single configuration out into many).
    fn evaluate_child(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        depth: usize,
        sink: &mut ErrorSink,
    ) -> Vec<Template> {
        if depth > self.max_depth {
            sink.capture(
                TemplateError::MaxDepthExceeded {
                    max_depth: self.max_depth,
                },
                path,
            );
            return Vec::new();
        }

        let Some(context) = self.extended_context(config, context, path, sink) else {
            return Vec::new();
        };

        match self.when_passes(config, &context, path, sink) {
            Some(true) => {}
            Some(false) | None => return Vec::new(),
        }

        let contexts = match self.fan_out(config, &context, path, sink) {
            Some(contexts) => contexts,
            None => return Vec::new(),
        };

        let mut templates = Vec::with_capacity(contexts.len());
        for item_context in &contexts {
            if let Some(template) = self.instantiate(config, item_context, path, depth, sink) {
                templates.push(template);
            }
        }
        templates
    }

    /// Build one template instance for one (possibly item-bound) context.
    fn instantiate(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        depth: usize,
        sink: &mut ErrorSink,
    ) -> Option<Template> {
        // Properties and children are evaluated before `type`/`name`, so
        // their failures are captured even when the instance ends up
        // dropped over a bad type or name.
        let properties = self.evaluate_properties(config, context, path, sink);
        let children = self.evaluate_children(config, context, path, depth, sink);

        let type_name = self.evaluate_string_field(
            config.type_name.as_ref(),
            "type",
            context,
            path,
            sink,
        )?;
        let name =
            self.evaluate_string_field(config.name.as_ref(), "name", context, path, sink)?;

        Some(Template {
            type_name,
            name,
            properties,
            children,
        })
    }

    /// Evaluate `withContext` against the received context. Entries are all
    /// evaluated against the incoming scope and merged afterwards, so sibling
    /// entries cannot observe each other. Returns None (and captures) when an
    /// entry's expression fails; that kills the whole level.
    fn extended_context(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        sink: &mut ErrorSink,
    ) -> Option<EvaluationContext> {
        if config.with_context.is_empty() {
            return Some(context.clone());
        }

        let mut entries = Vec::with_capacity(config.with_context.len());
        for (name, raw) in &config.with_context {
            match self.evaluate_raw(raw, context) {
                Ok(value) => entries.push((name.clone(), value)),
                Err(error) => {
                    sink.capture(error, join_path(path, "withContext", name));
                    return None;
                }
            }
        }
        Some(context.extended(entries))
    }

    /// Evaluate `when`. Some(true) = proceed, Some(false) = discarded
    /// silently, None = the condition expression itself failed (captured).
    fn when_passes(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        sink: &mut ErrorSink,
    ) -> Option<bool> {
        let Some(raw) = &config.when else {
            return Some(true);
        };
        match self.evaluate_raw(raw, context) {
            Ok(value) => Some(value.is_truthy()),
            Err(error) => {
                sink.capture(error, prefixed(path, "when"));
                None
            }
        }
    }

    /// Resolve `withItems` into the list of per-instance contexts. Without
    /// `withItems` there is exactly one instance with the level's context.
    fn fan_out(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        sink: &mut ErrorSink,
    ) -> Option<Vec<EvaluationContext>> {
        let Some(raw) = &config.with_items else {
            return Some(vec![context.clone()]);
        };

        let origin = prefixed(path, "withItems");
        let items = match self.evaluate_raw(raw, context) {
            Ok(value) => value,
            Err(error) => {
                sink.capture(error, origin);
                return None;
            }
        };

        let pairs: Vec<(Value, Value)> = match items {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (Value::Int(index as i64), item))
                .collect(),
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| (Value::String(key), item))
                .collect(),
            other => {
                sink.capture(TemplateError::not_iterable(other.type_name()), origin);
                return None;
            }
        };

        Some(
            pairs
                .into_iter()
                .map(|(key, item)| {
                    context.extended([("item".to_string(), item), ("key".to_string(), key)])
                })
                .collect(),
        )
    }

    /// Evaluate the property map. Each failure drops only that property.
    ///
    /// Raw array/object literals are rejected outright. Expression results
    /// may be lists or node references (declared `array<T>` properties and
    /// multi-valued references arrive that way); only map results are
    /// rejected after evaluation.
    fn evaluate_properties(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        sink: &mut ErrorSink,
    ) -> IndexMap<String, Value> {
        let mut properties = IndexMap::with_capacity(config.properties.len());
        for (name, raw) in &config.properties {
            let origin = join_path(path, "properties", name);
            if matches!(raw, Value::List(_) | Value::Map(_)) {
                sink.capture(
                    TemplateError::non_scalar_property(name, raw.type_name()),
                    origin,
                );
                continue;
            }
            match self.evaluate_raw(raw, context) {
                Ok(Value::Map(map)) => {
                    sink.capture(
                        TemplateError::non_scalar_property(name, Value::Map(map).type_name()),
                        origin,
                    );
                }
                Ok(value) => {
                    properties.insert(name.clone(), value);
                }
                Err(error) => sink.capture(error, origin),
            }
        }
        properties
    }

    /// Evaluate all child configurations, concatenating their template lists
    /// in declaration order.
    fn evaluate_children(
        &self,
        config: &RawConfiguration,
        context: &EvaluationContext,
        path: &str,
        depth: usize,
        sink: &mut ErrorSink,
    ) -> Vec<Template> {
        let mut children = Vec::new();
        for (key, child) in &config.child_nodes {
            let child_path = join_path(path, "childNodes", key);
            children.extend(self.evaluate_child(child, context, &child_path, depth + 1, sink));
        }
        children
    }

    /// Evaluate an optional `type`/`name` field to a string. Returns
    /// Some(None) when absent or null, None when the instance must be
    /// dropped (captured).
    #[allow(clippy::type_complexity)]
    fn evaluate_string_field(
        &self,
        raw: Option<&Value>,
        field: &'static str,
        context: &EvaluationContext,
        path: &str,
        sink: &mut ErrorSink,
    ) -> Option<Option<String>> {
        let Some(raw) = raw else {
            return Some(None);
        };
        let origin = prefixed(path, field);
        match self.evaluate_raw(raw, context) {
            Ok(Value::String(s)) => Some(Some(s)),
            Ok(Value::Null) => Some(None),
            Ok(other) => {
                sink.capture(
                    TemplateError::non_string_field(field, other.type_name()),
                    origin,
                );
                None
            }
            Err(error) => {
                sink.capture(error, origin);
                None
            }
        }
    }

    /// Evaluate one raw value: strings shaped like expressions go through
    /// the evaluator, everything else passes through as a literal.
    fn evaluate_raw(
        &self,
        raw: &Value,
        context: &EvaluationContext,
    ) -> Result<Value, TemplateError> {
        match raw {
            Value::String(s) if self.expressions.looks_like_expression(s) => {
                Ok(self.expressions.evaluate(s, context)?)
            }
            other => Ok(other.clone()),
        }
    }
}

fn prefixed(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_expr::Evaluator;
    use pretty_assertions::assert_eq;

    fn evaluate(yaml: &str, context: EvaluationContext) -> (RootTemplate, Vec<String>) {
        let mut sink = ErrorSink::new();
        let config = RawConfiguration::from_yaml_str(yaml, &mut sink).unwrap();
        let expressions = Evaluator::new();
        let evaluator = TemplateEvaluator::new(&expressions);
        let root = evaluator.evaluate(&config, &context, &mut sink);
        let errors = sink
            .into_errors()
            .into_iter()
            .map(|e| e.to_string())
            .collect();
        (root, errors)
    }

    #[test]
    fn test_simple_template() {
        // GIVEN
        let yaml = r#"
properties:
  title: "Hello"
childNodes:
  a:
    type: "T"
    properties:
      x: "${1+1}"
"#;

        // WHEN
        let (root, errors) = evaluate(yaml, EvaluationContext::new());

        // THEN
        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(root.properties["title"], Value::String("Hello".into()));
        assert_eq!(root.children.len(), 1);
        let child = &root.children[0];
        assert_eq!(child.type_name.as_deref(), Some("T"));
        assert_eq!(child.properties["x"], Value::Int(2));
    }

    #[test]
    fn test_property_failure_is_captured_even_when_the_type_fails_too() {
        // GIVEN: one child where both a property expression and the type
        // expression are unbound.
        let yaml = r#"
childNodes:
  broken:
    type: "${no_type}"
    properties:
      x: "${no_value}"
"#;

        // WHEN
        let (root, errors) = evaluate(yaml, EvaluationContext::new());

        // THEN: the instance is dropped, but both failures are reported,
        // properties before type.
        assert_eq!(root.children.len(), 0);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("childNodes.broken.properties.x:"));
        assert!(errors[1].starts_with("childNodes.broken.type:"));
    }

    #[test]
    fn test_when_falsy_discards_without_error() {
        // GIVEN
        let yaml = r#"
childNodes:
  hidden:
    type: "T"
    when: "${false}"
    childNodes:
      grandchild:
        type: "T"
  visible:
    type: "T"
"#;

        // WHEN
        let (root, errors) = evaluate(yaml, EvaluationContext::new());

        // THEN
        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].type_name.as_deref(), Some("T"));
    }

    #[test]
    fn test_with_items_fans_out_in_order() {
        // GIVEN
        let yaml = r#"
childNodes:
  entry:
    type: "T"
    withItems: "${data.items}"
    properties:
      label: "${item}"
      position: "${key}"
"#;
        let mut data = IndexMap::new();
        data.insert(
            "items".to_string(),
            Value::List(vec![
                Value::String("first".into()),
                Value::String("second".into()),
                Value::String("third".into()),
            ]),
        );
        let context =
            EvaluationContext::from_vars([("data".to_string(), Value::Map(data))]);

        // WHEN
        let (root, errors) = evaluate(yaml, context);

        // THEN
        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(root.children.len(), 3);
        for (index, label) in ["first", "second", "third"].iter().enumerate() {
            assert_eq!(
                root.children[index].properties["label"],
                Value::String(label.to_string())
            );
            assert_eq!(
                root.children[index].properties["position"],
                Value::Int(index as i64)
            );
        }
    }

    #[test]
    fn test_with_items_over_map_binds_string_keys() {
        let yaml = r#"
childNodes:
  entry:
    type: "T"
    withItems:
      en: "English"
      de: "German"
    properties:
      locale: "${key}"
      label: "${item}"
"#;
        let (root, errors) = evaluate(yaml, EvaluationContext::new());
        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].properties["locale"], Value::String("en".into()));
        assert_eq!(root.children[1].properties["label"], Value::String("German".into()));
    }

    #[test]
    fn test_with_items_not_iterable_drops_node_keeps_siblings() {
        // GIVEN
        let yaml = r#"
childNodes:
  bad:
    type: "T"
    withItems: "${42}"
  good:
    type: "T"
"#;

        // WHEN
        let (root, errors) = evaluate(yaml, EvaluationContext::new());

        // THEN
        assert_eq!(root.children.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("childNodes.bad.withItems:"));
    }

    #[test]
    fn test_with_context_is_scoped_and_sibling_isolated() {
        // GIVEN: entry b's withContext references outer scope but must not
        // see entry a's withContext, and sibling child nodes get the parent's
        // extension.
        let yaml = r#"
childNodes:
  wrapper:
    type: "T"
    withContext:
      greeting: "'Hello ' + who"
      loud: "${greeting}"
    properties:
      text: "${greeting}"
"#;
        let context =
            EvaluationContext::from_vars([("who".to_string(), Value::String("World".into()))]);

        // WHEN: `loud` referencing the sibling entry `greeting` fails (it
        // only sees the incoming scope), which kills the wrapper level.
        let (root, errors) = evaluate(yaml, context);

        // THEN
        assert_eq!(root.children.len(), 0);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("withContext.loud"));
        assert!(errors[0].contains("greeting"));
    }

    #[test]
    fn test_with_context_extends_scope_for_descendants() {
        let yaml = r#"
childNodes:
  wrapper:
    type: "T"
    withContext:
      greeting: "${'Hello ' + who}"
    childNodes:
      inner:
        type: "T"
        properties:
          text: "${greeting}"
"#;
        let context =
            EvaluationContext::from_vars([("who".to_string(), Value::String("World".into()))]);
        let (root, errors) = evaluate(yaml, context);
        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(
            root.children[0].children[0].properties["text"],
            Value::String("Hello World".into())
        );
    }

    #[test]
    fn test_non_scalar_property_is_dropped() {
        // GIVEN
        let yaml = r#"
properties:
  ok: "fine"
  bad: [1, 2, 3]
  alsoBad:
    nested: true
"#;

        // WHEN
        let (root, errors) = evaluate(yaml, EvaluationContext::new());

        // THEN
        assert_eq!(root.properties.len(), 1);
        assert!(root.properties.contains_key("ok"));
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("properties.bad:"));
        assert!(errors[1].starts_with("properties.alsoBad:"));
    }

    #[test]
    fn test_expression_list_result_is_admitted() {
        // GIVEN: a declared-array property fed from an expression. Raw list
        // literals are rejected, expression results are not.
        let yaml = r#"
properties:
  tags: "${data.tags}"
"#;
        let mut data = IndexMap::new();
        data.insert(
            "tags".to_string(),
            Value::List(vec![Value::String("a".into()), Value::String("b".into())]),
        );
        let context = EvaluationContext::from_vars([("data".to_string(), Value::Map(data))]);

        // WHEN
        let (root, errors) = evaluate(yaml, context);

        // THEN
        assert_eq!(errors, Vec::<String>::new());
        assert!(matches!(root.properties["tags"], Value::List(_)));
    }

    #[test]
    fn test_expression_failure_drops_only_that_subtree() {
        // GIVEN: the failing expression sits on childNodes.foo's type; its
        // sibling must survive.
        let yaml = r#"
childNodes:
  foo:
    type: "${unbound}"
    properties:
      title: "never evaluated into a node"
  bar:
    type: "T"
"#;

        // WHEN
        let (root, errors) = evaluate(yaml, EvaluationContext::new());

        // THEN
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].type_name.as_deref(), Some("T"));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("childNodes.foo.type:"));
    }

    #[test]
    fn test_property_expression_failure_drops_only_that_property() {
        let yaml = r#"
childNodes:
  foo:
    type: "T"
    properties:
      title: "kept"
      broken: "${1 / 0}"
"#;
        let (root, errors) = evaluate(yaml, EvaluationContext::new());
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].properties.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("childNodes.foo.properties.broken:"));
    }

    #[test]
    fn test_recursion_guard() {
        // GIVEN a template nested deeper than the guard allows
        let mut yaml = String::from("childNodes:\n");
        let mut indent = String::from("  ");
        for i in 0..10 {
            yaml.push_str(&format!("{}n{}:\n", indent, i));
            indent.push_str("  ");
            yaml.push_str(&format!("{}type: \"T\"\n", indent));
            if i < 9 {
                yaml.push_str(&format!("{}childNodes:\n", indent));
                indent.push_str("  ");
            }
        }

        // WHEN
        let (_, errors) = evaluate(&yaml, EvaluationContext::new());

        // THEN
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("maximum depth"));
    }

    #[test]
    fn test_root_when_falsy_produces_empty_template() {
        let yaml = r#"
when: "${false}"
properties:
  title: "never"
"#;
        let (root, errors) = evaluate(yaml, EvaluationContext::new());
        assert_eq!(root, RootTemplate::empty());
        assert_eq!(errors, Vec::<String>::new());
    }
}
