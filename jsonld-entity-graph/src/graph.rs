//! Graph assembly primitives
//!
//! While a document is being built, `@graph` is an object keyed by node
//! `@id` so fragments can merge into the right node cheaply. Only the
//! finished top-level document flattens `@graph` to the array form the
//! JSON-LD output uses.

use serde_json::{Map, Value as JsonValue};

/// Build a `{"@graph": {node_id: properties}}` fragment ready to merge
/// into a document under assembly.
pub fn graph_fragment(node_id: &str, properties: Map<String, JsonValue>) -> JsonValue {
    let mut node_map = Map::new();
    node_map.insert(node_id.to_string(), JsonValue::Object(properties));
    let mut fragment = Map::new();
    fragment.insert("@graph".to_string(), JsonValue::Object(node_map));
    JsonValue::Object(fragment)
}

/// Recursively merge `incoming` into `target`.
///
/// Objects merge key-wise, arrays concatenate, anything else is replaced by
/// the incoming value.
pub fn merge_deep(target: &mut JsonValue, incoming: JsonValue) {
    match (target, incoming) {
        (JsonValue::Object(target_map), JsonValue::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_deep(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (JsonValue::Array(target_items), JsonValue::Array(incoming_items)) => {
            target_items.extend(incoming_items);
        }
        (slot, value) => *slot = value,
    }
}

/// Convert a document's keyed `@graph` object into the array form,
/// preserving insertion order. A document whose `@graph` is already an
/// array is left untouched.
pub fn flatten_graph(document: &mut JsonValue) {
    if let Some(graph) = document.get_mut("@graph") {
        if let JsonValue::Object(nodes) = graph {
            let flat: Vec<JsonValue> = std::mem::take(nodes).into_iter().map(|(_, v)| v).collect();
            *graph = JsonValue::Array(flat);
        }
    }
}
