//! Entity reference normalization
//!
//! A reference item either embeds the target entity as an extra graph node
//! linked by `@id`, or, when the mapping configures a reference callback,
//! collapses to a single value derived from the target without embedding.

use crate::entity::ContentEntity;
use crate::error::Result;
use crate::graph::{graph_fragment, merge_deep};
use crate::mapping::FieldMapping;
use crate::normalize::{GraphNormalizer, NormalizeContext};
use serde_json::{json, Map, Value as JsonValue};
use tracing::warn;

impl GraphNormalizer {
    /// Normalize one reference item into a `{"@graph": ...}` fragment ready
    /// to merge into the parent document.
    pub(crate) fn normalize_reference(
        &self,
        target: &dyn ContentEntity,
        field_mapping: &FieldMapping,
        context: &NormalizeContext,
    ) -> Result<JsonValue> {
        if let Some(callback) = &field_mapping.datatype_callback {
            match self.callbacks.reference(&callback.callable) {
                Some(convert) => {
                    let value = convert(target, callback.arguments.as_ref());
                    let value_object = if field_mapping.datatype.as_deref() == Some("@id") {
                        let mut object = Map::new();
                        object.insert("@id".to_string(), value);
                        object.insert("@type".to_string(), JsonValue::String("@id".to_string()));
                        object
                    } else {
                        let mut object = Map::new();
                        object.insert("@value".to_string(), value);
                        if let Some(datatype) = &field_mapping.datatype {
                            object.insert(
                                "@type".to_string(),
                                JsonValue::String(datatype.clone()),
                            );
                        }
                        object
                    };
                    let properties =
                        self.fan_out(JsonValue::Object(value_object), field_mapping, context);
                    return Ok(graph_fragment(&context.current_entity_id, properties));
                }
                None => {
                    warn!(
                        callable = %callback.callable,
                        "unknown reference callback, embedding target instead"
                    );
                }
            }
        }

        // Embed the target with only its uuid field serialized. Deeper
        // references on the target are never walked, which bounds reference
        // cycles without a visited set.
        let mut child = context.clone();
        child.depth += 1;
        child.embedded = true;
        child.needs_context = false;
        child.included_fields = Some(vec!["uuid".to_string()]);
        child.langcode = None;
        let mut fragment = self.normalize_entity(target, child)?;

        let target_id = fragment
            .get("@graph")
            .and_then(JsonValue::as_object)
            .and_then(|graph| graph.keys().next())
            .cloned()
            .unwrap_or_default();

        let properties = self.fan_out(json!({"@id": target_id}), field_mapping, context);
        merge_deep(
            &mut fragment,
            graph_fragment(&context.current_entity_id, properties),
        );
        Ok(fragment)
    }

    /// Attach one value object to every predicate the field maps to,
    /// expanding predicates unless an inline context keeps them compact.
    fn fan_out(
        &self,
        value_object: JsonValue,
        field_mapping: &FieldMapping,
        context: &NormalizeContext,
    ) -> Map<String, JsonValue> {
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
                values.push(value_object.clone());
            }
        }
        properties
    }
}
