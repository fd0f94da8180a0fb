use super::common::null_as_default;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One page of a listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Value>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Pagination metadata. Single-page endpoints omit it entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "deserialize_cursor")]
    pub next_cursor: Option<String>,
}

impl Page {
    /// Continuation token, `None` once the stream is exhausted.
    pub fn next_cursor(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|meta| meta.next_cursor.as_deref())
    }
}

/// The API sends the cursor as an integer; strings are accepted too.
/// Empty strings and `null` both end the stream.
fn deserialize_cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
