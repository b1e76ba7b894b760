//! Duplicate elimination inside a partially built graph
//!
//! Repeated merges can plant the same rdf:type string or the same reference
//! object into a node more than once. The pass below is run after every
//! fragment merge and is idempotent.

use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Remove duplicate `@type` strings and duplicate `@id` reference objects
/// from every node in the document's `@graph`, keeping first occurrences.
pub fn deduplicate_types_and_references(document: &mut JsonValue) {
    let Some(graph) = document.get_mut("@graph") else {
        return;
    };
    match graph {
        JsonValue::Object(nodes) => {
            for (_, node) in nodes.iter_mut() {
                dedup_node(node);
            }
        }
        JsonValue::Array(nodes) => {
            for node in nodes {
                dedup_node(node);
            }
        }
        _ => {}
    }
}

fn dedup_node(node: &mut JsonValue) {
    let JsonValue::Object(map) = node else {
        return;
    };
    for (key, value) in map.iter_mut() {
        let JsonValue::Array(items) = value else {
            continue;
        };
        if key == "@type" {
            let mut seen = HashSet::new();
            items.retain(|item| match item {
                JsonValue::String(s) => seen.insert(s.clone()),
                _ => true,
            });
        } else if items.len() > 1 {
            // Only objects carrying an @id participate; literal value
            // objects are kept verbatim even when equal.
            let mut seen = HashSet::new();
            items.retain(|item| match item.get("@id").and_then(JsonValue::as_str) {
                Some(id) => seen.insert(id.to_string()),
                None => true,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duplicate_types_removed() {
        let mut document = json!({
            "@graph": {
                "a": {"@type": ["schema:Thing", "schema:Person", "schema:Thing"]}
            }
        });
        deduplicate_types_and_references(&mut document);
        assert_eq!(
            document["@graph"]["a"]["@type"],
            json!(["schema:Thing", "schema:Person"])
        );
    }

    #[test]
    fn test_duplicate_references_removed_literals_kept() {
        let mut document = json!({
            "@graph": {
                "a": {
                    "schema:author": [
                        {"@id": "http://x/user/1"},
                        {"@id": "http://x/user/1"},
                        {"@id": "http://x/user/2"}
                    ],
                    "dc:title": [{"@value": "same"}, {"@value": "same"}]
                }
            }
        });
        deduplicate_types_and_references(&mut document);
        assert_eq!(
            document["@graph"]["a"]["schema:author"],
            json!([{"@id": "http://x/user/1"}, {"@id": "http://x/user/2"}])
        );
        // Equal literals survive
        assert_eq!(
            document["@graph"]["a"]["dc:title"],
            json!([{"@value": "same"}, {"@value": "same"}])
        );
    }

    #[test]
    fn test_idempotent_over_array_graph() {
        let mut document = json!({
            "@graph": [
                {"@type": ["schema:Thing", "schema:Thing"]}
            ]
        });
        deduplicate_types_and_references(&mut document);
        let once = document.clone();
        deduplicate_types_and_references(&mut document);
        assert_eq!(document, once);
    }
}
