//! Collaborator contracts for the host's entity/field system
//!
//! The engine never loads or stores entities itself. The host hands it
//! objects implementing [`ContentEntity`], which expose just enough surface
//! to walk fields, check view access, and resolve references.

use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;

/// Viewer identity used for per-field view-access checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub uid: String,
}

impl Account {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

/// One field item: a raw value map plus, for entity references, the
/// resolved target entity.
///
/// Scalar items carry their value under the `"value"` key; reference items
/// carry `"target_id"` and a `target`.
#[derive(Debug, Clone, Default)]
pub struct FieldItem {
    pub values: Map<String, JsonValue>,
    pub target: Option<Arc<dyn ContentEntity>>,
}

impl FieldItem {
    /// A scalar item with a `"value"` key
    pub fn scalar(value: impl Into<JsonValue>) -> Self {
        let mut values = Map::new();
        values.insert("value".to_string(), value.into());
        Self {
            values,
            target: None,
        }
    }

    /// A reference item pointing at a resolved target entity
    pub fn reference(target: Arc<dyn ContentEntity>) -> Self {
        let mut values = Map::new();
        values.insert(
            "target_id".to_string(),
            JsonValue::String(target.id().to_string()),
        );
        Self {
            values,
            target: Some(target),
        }
    }

    /// The raw scalar value, if any
    pub fn value(&self) -> Option<&JsonValue> {
        self.values.get("value")
    }
}

/// A content-bearing entity as seen by the normalizer.
pub trait ContentEntity: fmt::Debug + Send + Sync {
    /// Entity type id, e.g. "node"
    fn entity_type_id(&self) -> &str;

    /// Bundle id, e.g. "article"
    fn bundle(&self) -> &str;

    /// Serial id used in canonical URIs
    fn id(&self) -> &str;

    /// Stable UUID
    fn uuid(&self) -> &str;

    /// Content language code, if the entity is language-aware
    fn langcode(&self) -> Option<&str> {
        None
    }

    /// All field names present on the entity
    fn field_names(&self) -> Vec<String>;

    /// Items of one field, or None if the field does not exist / is empty
    fn field(&self, name: &str) -> Option<Vec<FieldItem>>;

    /// Whether the viewer may see this field. Denied fields silently
    /// contribute nothing to the graph.
    fn field_access(&self, _field: &str, _viewer: Option<&Account>) -> bool {
        true
    }

    /// File entities get direct file URLs instead of canonical routes
    fn is_file(&self) -> bool {
        false
    }

    /// Direct URL of the stored file, for file entities
    fn file_url(&self) -> Option<String> {
        None
    }
}

/// A field definition: name plus the primitive field-type identifier used
/// to look up default term definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// Source of field definitions per bundle, supplied by the host.
pub trait FieldDefinitionSource: Send + Sync {
    /// Bundle-specific field definitions
    fn bundle_fields(&self, entity_type: &str, bundle: &str) -> Vec<FieldDefinition>;

    /// Entity-base field definitions shared by all bundles of the type
    fn base_fields(&self, entity_type: &str) -> Vec<FieldDefinition>;
}

/// In-memory [`FieldDefinitionSource`] for hosts with a static field set.
#[derive(Debug, Default)]
pub struct StaticFieldDefinitions {
    bundle: std::collections::HashMap<(String, String), Vec<FieldDefinition>>,
    base: std::collections::HashMap<String, Vec<FieldDefinition>>,
}

impl StaticFieldDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bundle_field(
        &mut self,
        entity_type: &str,
        bundle: &str,
        name: &str,
        field_type: &str,
    ) {
        self.bundle
            .entry((entity_type.to_string(), bundle.to_string()))
            .or_default()
            .push(FieldDefinition::new(name, field_type));
    }

    pub fn add_base_field(&mut self, entity_type: &str, name: &str, field_type: &str) {
        self.base
            .entry(entity_type.to_string())
            .or_default()
            .push(FieldDefinition::new(name, field_type));
    }
}

impl FieldDefinitionSource for StaticFieldDefinitions {
    fn bundle_fields(&self, entity_type: &str, bundle: &str) -> Vec<FieldDefinition> {
        self.bundle
            .get(&(entity_type.to_string(), bundle.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn base_fields(&self, entity_type: &str) -> Vec<FieldDefinition> {
        self.base.get(entity_type).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_item() {
        let item = FieldItem::scalar("Hello");
        assert_eq!(item.value(), Some(&json!("Hello")));
        assert!(item.target.is_none());
    }

    #[test]
    fn test_static_field_definitions() {
        let mut defs = StaticFieldDefinitions::new();
        defs.add_bundle_field("node", "article", "field_body", "text_long");
        defs.add_base_field("node", "title", "string");

        assert_eq!(
            defs.bundle_fields("node", "article"),
            [FieldDefinition::new("field_body", "text_long")]
        );
        assert_eq!(
            defs.base_fields("node"),
            [FieldDefinition::new("title", "string")]
        );
        assert!(defs.bundle_fields("node", "page").is_empty());
    }
}
