use crate::data_fetcher::models::Record;
use serde_json::Value;

/// Flattens one level of nesting out of each item.
///
/// A field holding an object is replaced by its children, each keyed
/// `{field}_{child}`; every other field is copied unchanged. Grandchildren
/// are not expanded, so an object nested two levels down stays an object.
/// Items that are not objects produce an empty record. When a prefixed key
/// collides with an existing one the later field wins.
pub fn flatten_records(items: &[Value]) -> Vec<Record> {
    items.iter().map(flatten_item).collect()
}

/// Flattens a single item, see [`flatten_records`].
pub fn flatten_item(item: &Value) -> Record {
    let mut record = Record::new();
    let Some(fields) = item.as_object() else {
        return record;
    };

    for (key, value) in fields {
        match value {
            Value::Object(children) => {
                for (child_key, child_value) in children {
                    record.insert(format!("{key}_{child_key}"), child_value.clone());
                }
            }
            _ => {
                record.insert(key.clone(), value.clone());
            }
        }
    }

    record
}
