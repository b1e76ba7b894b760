//! Default field-type to JSON-LD term-definition table
//!
//! When a field's mapping declares no datatype, the context generator falls
//! back to this table, keyed by the host's primitive field-type identifier.
//! The table is an explicit configuration value: hosts override entries with
//! a merge step at construction time.

use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

/// Field-type identifier -> default term definition (`{"@type": ...}`).
#[derive(Debug, Clone)]
pub struct FieldTypeDefaults {
    map: HashMap<String, JsonValue>,
}

impl Default for FieldTypeDefaults {
    fn default() -> Self {
        let mut map = HashMap::new();
        for field_type in ["string", "string_long", "text", "text_long", "text_with_summary"] {
            map.insert(field_type.to_string(), json!({"@type": "xsd:string"}));
        }
        for field_type in ["datetime", "timestamp", "created", "changed"] {
            map.insert(field_type.to_string(), json!({"@type": "xsd:dateTime"}));
        }
        map.insert("integer".to_string(), json!({"@type": "xsd:integer"}));
        map.insert("decimal".to_string(), json!({"@type": "xsd:decimal"}));
        map.insert("float".to_string(), json!({"@type": "xsd:double"}));
        map.insert("boolean".to_string(), json!({"@type": "xsd:boolean"}));
        map.insert("entity_reference".to_string(), json!({"@type": "@id"}));
        map.insert("uri".to_string(), json!({"@type": "xsd:anyURI"}));
        Self { map }
    }
}

impl FieldTypeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge host overrides over the built-in entries; overrides win.
    pub fn with_overrides(mut self, overrides: HashMap<String, JsonValue>) -> Self {
        self.map.extend(overrides);
        self
    }

    /// Term definition for a field type, falling back to `xsd:string`.
    pub fn term_for(&self, field_type: &str) -> JsonValue {
        self.map
            .get(field_type)
            .cloned()
            .unwrap_or_else(|| json!({"@type": "xsd:string"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        let defaults = FieldTypeDefaults::new();
        assert_eq!(defaults.term_for("text"), json!({"@type": "xsd:string"}));
        assert_eq!(defaults.term_for("created"), json!({"@type": "xsd:dateTime"}));
        assert_eq!(defaults.term_for("entity_reference"), json!({"@type": "@id"}));
    }

    #[test]
    fn test_unknown_type_falls_back_to_string() {
        let defaults = FieldTypeDefaults::new();
        assert_eq!(defaults.term_for("geolocation"), json!({"@type": "xsd:string"}));
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = HashMap::new();
        overrides.insert("text".to_string(), json!({"@type": "rdf:HTML"}));
        let defaults = FieldTypeDefaults::new().with_overrides(overrides);
        assert_eq!(defaults.term_for("text"), json!({"@type": "rdf:HTML"}));
        // Untouched entries keep their defaults
        assert_eq!(defaults.term_for("integer"), json!({"@type": "xsd:integer"}));
    }
}
