//! Scalar field item normalization
//!
//! A scalar item becomes a JSON-LD value object, typed from the mapping's
//! datatype or the field's context term definition, then fanned out to every
//! predicate the field maps to.

use crate::entity::FieldItem;
use crate::error::Result;
use crate::mapping::{FieldMapping, RdfMapping};
use crate::normalize::{GraphNormalizer, NormalizeContext};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use jsonld_vocab::xsd;

impl GraphNormalizer {
    /// Normalize one scalar field item into a predicate -> value-object map.
    ///
    /// Items without a `value` key contribute nothing.
    pub(crate) fn normalize_field_item(
        &self,
        field_name: &str,
        item: &FieldItem,
        field_mapping: &FieldMapping,
        mapping: &RdfMapping,
        context: &NormalizeContext,
    ) -> Result<Map<String, JsonValue>> {
        let Some(raw) = item.value() else {
            return Ok(Map::new());
        };

        let mut value_object = Map::new();
        value_object.insert("@value".to_string(), raw.clone());

        if let Some(callback) = &field_mapping.datatype_callback {
            match self.callbacks.value(&callback.callable) {
                Some(convert) => {
                    let converted = convert(&item.values, callback.arguments.as_ref());
                    value_object.insert("@value".to_string(), converted);
                }
                None => {
                    warn!(
                        callable = %callback.callable,
                        field = field_name,
                        "unknown datatype callback, emitting raw value"
                    );
                }
            }
        }
        if let Some(datatype) = &field_mapping.datatype {
            value_object.insert("@type".to_string(), JsonValue::String(datatype.clone()));
        }

        // Keys the field's context term definition carries but the value
        // object does not yet are taken over; explicit keys win.
        let field_context = self.context_generator.field_context(mapping, field_name)?;
        if let Some(first_property) = field_mapping.properties.first() {
            if let Some(JsonValue::Object(term)) = field_context.get(first_property) {
                for (key, value) in term {
                    value_object
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        }

        apply_language(&mut value_object, context);

        if !context.needs_context {
            for (_, value) in value_object.iter_mut() {
                if let JsonValue::String(s) = value {
                    *value = JsonValue::String(context.namespaces.expand(s));
                }
            }
        }

        let mut properties = Map::new();
        for property in &field_mapping.properties {
            let key = if context.needs_context {
                property.clone()
            } else {
                context.namespaces.expand(property)
            };
            let slot = properties
                .entry(key)
                .or_insert_with(|| JsonValue::Array(Vec::new()));
            if let Some(values) = slot.as_array_mut() {
                values.push(JsonValue::Object(value_object.clone()));
            }
        }
        Ok(properties)
    }
}

/// String-typed literals in a language-aware serialization carry
/// `@language` instead of `@type`; the two keys never coexist. Literals
/// with any other datatype keep their `@type` and get no language tag.
fn apply_language(value_object: &mut Map<String, JsonValue>, context: &NormalizeContext) {
    let Some(langcode) = &context.langcode else {
        return;
    };
    let is_string = match value_object.get("@type").and_then(JsonValue::as_str) {
        Some(datatype) => datatype == "xsd:string" || datatype == xsd::STRING,
        None => true,
    };
    if is_string {
        value_object.remove("@type");
        value_object.insert(
            "@language".to_string(),
            JsonValue::String(langcode.clone()),
        );
    }
}
