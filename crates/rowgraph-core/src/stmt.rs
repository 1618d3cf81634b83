mod value;
pub use value::Value;

use indexmap::IndexMap;

/// An ordered set of named values.
///
/// Used both for database rows (keyed by column name or output label) and for
/// instances (keyed by property name).
pub type Record = IndexMap<String, Value>;

/// Builds a [`Record`] from a JSON object, keeping scalar members only.
pub fn record_from_json(json: &serde_json::Map<String, serde_json::Value>) -> Record {
    json.iter()
        .filter_map(|(key, value)| Some((key.clone(), Value::from_json(value)?)))
        .collect()
}

/// Renders a [`Record`] as a JSON object.
pub fn record_to_json(record: &Record) -> serde_json::Map<String, serde_json::Value> {
    record
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}
