//! Raw template configuration.
//!
//! A configuration level recognizes exactly seven keys: `type`, `name`,
//! `properties`, `childNodes`, `when`, `withItems`, `withContext`. The root
//! level additionally forbids `type`, `name` and `withItems` (the root
//! describes the already-existing node the template is attached to and
//! cannot repeat itself). Anything else is a structural error: the offending
//! node is dropped and captured, its siblings survive.

use crate::{TemplateError, TemplateResult};
use graft_core::{CapturedError, ErrorSink, Value};
use indexmap::IndexMap;

const KEY_TYPE: &str = "type";
const KEY_NAME: &str = "name";
const KEY_PROPERTIES: &str = "properties";
const KEY_CHILD_NODES: &str = "childNodes";
const KEY_WHEN: &str = "when";
const KEY_WITH_ITEMS: &str = "withItems";
const KEY_WITH_CONTEXT: &str = "withContext";

/// One parsed configuration level. All values are unevaluated.
#[derive(Debug, Clone, Default)]
pub struct RawConfiguration {
    /// Raw `type` value (absent on the root).
    pub type_name: Option<Value>,
    /// Raw `name` value (absent on the root).
    pub name: Option<Value>,
    /// Raw `when` condition.
    pub when: Option<Value>,
    /// Raw `withItems` iteration source (absent on the root).
    pub with_items: Option<Value>,
    /// Raw `withContext` variable definitions, in declaration order.
    pub with_context: IndexMap<String, Value>,
    /// Raw property values, in declaration order.
    pub properties: IndexMap<String, Value>,
    /// Child configurations, keyed by their configuration key.
    pub child_nodes: IndexMap<String, RawConfiguration>,
}

impl RawConfiguration {
    /// Parse a root-level configuration from YAML text. A structural error
    /// at the root is fatal (there is nothing left to evaluate); structural
    /// errors below the root are captured into the sink and the offending
    /// child is dropped.
    pub fn from_yaml_str(yaml: &str, sink: &mut ErrorSink) -> TemplateResult<Self> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let value = value_from_yaml(parsed)?;
        Self::from_value(&value, sink)
    }

    /// Parse a root-level configuration from an already-loaded value tree.
    pub fn from_value(value: &Value, sink: &mut ErrorSink) -> TemplateResult<Self> {
        Self::parse_level(value, true, "", sink)
    }

    fn parse_level(
        value: &Value,
        is_root: bool,
        path: &str,
        sink: &mut ErrorSink,
    ) -> TemplateResult<Self> {
        let level = if is_root { "root" } else { "child" };
        let Some(map) = value.as_map() else {
            return Err(TemplateError::expected_map(
                "template configuration",
                value.type_name(),
            ));
        };

        let mut config = RawConfiguration::default();
        for (key, entry) in map {
            match key.as_str() {
                KEY_TYPE if !is_root => config.type_name = Some(entry.clone()),
                KEY_NAME if !is_root => config.name = Some(entry.clone()),
                KEY_WITH_ITEMS if !is_root => config.with_items = Some(entry.clone()),
                KEY_WHEN => config.when = Some(entry.clone()),
                KEY_WITH_CONTEXT => {
                    config.with_context = expect_map(entry, KEY_WITH_CONTEXT)?.clone();
                }
                KEY_PROPERTIES => {
                    config.properties = expect_map(entry, KEY_PROPERTIES)?.clone();
                }
                KEY_CHILD_NODES => {
                    let children = expect_map(entry, KEY_CHILD_NODES)?;
                    for (child_key, child_value) in children {
                        let child_path = join_path(path, KEY_CHILD_NODES, child_key);
                        match Self::parse_level(child_value, false, &child_path, sink) {
                            Ok(child) => {
                                config.child_nodes.insert(child_key.clone(), child);
                            }
                            // Structural error below the root: drop this
                            // child, keep its siblings.
                            Err(error) => sink.push(CapturedError::with_origin(error, child_path)),
                        }
                    }
                }
                other => return Err(TemplateError::illegal_key(other, level)),
            }
        }
        Ok(config)
    }
}

fn expect_map<'v>(
    value: &'v Value,
    field: &'static str,
) -> TemplateResult<&'v IndexMap<String, Value>> {
    value
        .as_map()
        .ok_or_else(|| TemplateError::expected_map(field, value.type_name()))
}

pub(crate) fn join_path(base: &str, segment: &str, key: &str) -> String {
    if base.is_empty() {
        format!("{}.{}", segment, key)
    } else {
        format!("{}.{}.{}", base, segment, key)
    }
}

/// Convert a parsed YAML document into the pipeline's value model.
/// Mapping order is preserved; non-string mapping keys are rejected.
pub fn value_from_yaml(yaml: serde_yaml::Value) -> TemplateResult<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            let converted: TemplateResult<Vec<Value>> =
                items.into_iter().map(value_from_yaml).collect();
            Value::List(converted?)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = IndexMap::with_capacity(mapping.len());
            for (key, value) in mapping {
                let serde_yaml::Value::String(key) = key else {
                    return Err(TemplateError::expected_map(
                        "mapping key",
                        "non-string key",
                    ));
                };
                map.insert(key, value_from_yaml(value)?);
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => value_from_yaml(tagged.value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::ErrorSink;

    #[test]
    fn test_parse_recognized_keys() {
        // GIVEN
        let yaml = r#"
properties:
  title: "Hello"
childNodes:
  main:
    type: "Acme.Site:Text"
    name: "main"
    when: "${true}"
    withItems: "${data.items}"
    withContext:
      greeting: "hi"
    properties:
      text: "${greeting}"
"#;
        let mut sink = ErrorSink::new();

        // WHEN
        let config = RawConfiguration::from_yaml_str(yaml, &mut sink).unwrap();

        // THEN
        assert!(sink.is_empty());
        assert_eq!(config.properties.len(), 1);
        let child = &config.child_nodes["main"];
        assert_eq!(
            child.type_name,
            Some(Value::String("Acme.Site:Text".into()))
        );
        assert!(child.with_items.is_some());
        assert_eq!(child.with_context["greeting"], Value::String("hi".into()));
    }

    #[test]
    fn test_root_forbids_type_name_and_with_items() {
        let mut sink = ErrorSink::new();
        let result = RawConfiguration::from_yaml_str("type: 'T'", &mut sink);
        assert!(matches!(result, Err(TemplateError::IllegalKey { .. })));

        let result = RawConfiguration::from_yaml_str("withItems: [1]", &mut sink);
        assert!(matches!(result, Err(TemplateError::IllegalKey { .. })));
    }

    #[test]
    fn test_illegal_key_in_child_drops_only_that_child() {
        // GIVEN
        let yaml = r#"
childNodes:
  bad:
    type: "T"
    bogusKey: 1
  good:
    type: "T"
"#;
        let mut sink = ErrorSink::new();

        // WHEN
        let config = RawConfiguration::from_yaml_str(yaml, &mut sink).unwrap();

        // THEN
        assert!(!config.child_nodes.contains_key("bad"));
        assert!(config.child_nodes.contains_key("good"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.errors()[0].origin.as_deref(), Some("childNodes.bad"));
    }

    #[test]
    fn test_nested_child_paths() {
        // GIVEN
        let yaml = r#"
childNodes:
  outer:
    type: "T"
    childNodes:
      inner:
        oops: true
"#;
        let mut sink = ErrorSink::new();

        // WHEN
        let config = RawConfiguration::from_yaml_str(yaml, &mut sink).unwrap();

        // THEN
        let outer = &config.child_nodes["outer"];
        assert!(outer.child_nodes.is_empty());
        assert_eq!(
            sink.errors()[0].origin.as_deref(),
            Some("childNodes.outer.childNodes.inner")
        );
    }

    #[test]
    fn test_yaml_order_is_preserved() {
        let yaml = "childNodes:\n  z: {type: T}\n  a: {type: T}\n  m: {type: T}\n";
        let mut sink = ErrorSink::new();
        let config = RawConfiguration::from_yaml_str(yaml, &mut sink).unwrap();
        let keys: Vec<&str> = config.child_nodes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
