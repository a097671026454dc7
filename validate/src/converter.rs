//! Conversion seam for class-like declared property kinds.

use graft_core::Value;

/// Best-effort conversion of a property value into a class-like declared
/// kind. The pipeline itself only knows primitive kinds; anything else is
/// delegated here.
pub trait PropertyConverter {
    /// Convert `value` into the named class kind, or describe why not.
    fn convert(&self, value: &Value, class_name: &str) -> Result<Value, String>;
}

/// Converter that knows no class kinds at all. Every class-typed property
/// is rejected with an explanatory message.
#[derive(Debug, Default)]
pub struct NoConversion;

impl PropertyConverter for NoConversion {
    fn convert(&self, _value: &Value, class_name: &str) -> Result<Value, String> {
        Err(format!("no converter registered for '{}'", class_name))
    }
}
