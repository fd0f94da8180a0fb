//! Shared serde helpers and the scalar cell type used by the response models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Deserializes `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders one JSON value as CSV cell text.
///
/// `null` becomes an empty cell, strings are written raw, numbers and
/// booleans use their JSON spelling, and structured values are kept as
/// compact JSON rather than being expanded further.
pub fn value_to_cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// A scalar field of an upstream document. Missing and `null` fields both
/// deserialize to an empty cell, and any JSON type is accepted so a field
/// that changes type upstream never fails the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell(pub Option<Value>);

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self.0, None | Some(Value::Null))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => f.write_str(&value_to_cell_text(value)),
            None => Ok(()),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Cell(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_cell_text() {
        assert_eq!(value_to_cell_text(&Value::Null), "");
        assert_eq!(value_to_cell_text(&json!("Final")), "Final");
        assert_eq!(value_to_cell_text(&json!(20)), "20");
        assert_eq!(value_to_cell_text(&json!(0.455)), "0.455");
        assert_eq!(value_to_cell_text(&json!(true)), "true");
        assert_eq!(value_to_cell_text(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(value_to_cell_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_cell_missing_and_null_are_empty() {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Holder {
            present: Cell,
            null: Cell,
            missing: Cell,
        }

        let holder: Holder = serde_json::from_value(json!({"present": 7, "null": null})).unwrap();
        assert_eq!(holder.present.to_string(), "7");
        assert!(holder.null.is_empty());
        assert_eq!(holder.null.to_string(), "");
        assert!(holder.missing.is_empty());
        assert_eq!(holder.missing.to_string(), "");
    }
}
