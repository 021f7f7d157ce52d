//! Optional-field extraction over open event payloads.
//!
//! Payload keys arrive in either snake_case or camelCase depending on
//! which writer produced the row, so every lookup takes a list of
//! accepted keys and uses the first one that holds a usable value.

use serde_json::Value;

use super::events::{EventData, PlayerId};

/// Normalize an identifier value (string or integer) to text
pub fn id_from_value(value: &Value) -> Option<PlayerId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty string among `keys`
pub fn str_field<'a>(data: &'a EventData, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| data.get(*key))
        .find_map(|value| value.as_str().filter(|s| !s.trim().is_empty()))
}

/// First usable identifier among `keys`
pub fn id_field(data: &EventData, keys: &[&str]) -> Option<PlayerId> {
    keys.iter().filter_map(|key| data.get(*key)).find_map(id_from_value)
}

/// First array found among `keys`, with unusable ids kept as `None`
/// so positions still line up with parallel name lists.
pub fn id_list(data: &EventData, keys: &[&str]) -> Vec<Option<PlayerId>> {
    first_array(data, keys)
        .map(|items| items.iter().map(id_from_value).collect())
        .unwrap_or_default()
}

/// First array found among `keys`, non-string entries kept as `None`
pub fn name_list(data: &EventData, keys: &[&str]) -> Vec<Option<String>> {
    first_array(data, keys)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().filter(|s| !s.trim().is_empty()).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn first_array<'a>(data: &'a EventData, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().filter_map(|key| data.get(*key)).find_map(Value::as_array)
}
