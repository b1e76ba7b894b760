//! Shared fixtures for integration tests

#![allow(dead_code)]

use jsonld_entity_graph::entity::{ContentEntity, FieldItem};
use jsonld_entity_graph::{
    Account, CanonicalUriBuilder, ContextGenerator, GraphNormalizer, MemoryCache,
    StaticFieldDefinitions, StaticMappings,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A content entity backed by plain in-memory data.
#[derive(Debug, Clone)]
pub struct TestEntity {
    pub entity_type: String,
    pub bundle: String,
    pub id: String,
    pub uuid: String,
    pub langcode: Option<String>,
    pub fields: Vec<(String, Vec<FieldItem>)>,
    pub denied_fields: Vec<String>,
    pub file_url: Option<String>,
}

impl TestEntity {
    pub fn new(entity_type: &str, bundle: &str, id: &str, uuid: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            bundle: bundle.to_string(),
            id: id.to_string(),
            uuid: uuid.to_string(),
            langcode: None,
            fields: Vec::new(),
            denied_fields: Vec::new(),
            file_url: None,
        }
    }

    pub fn with_langcode(mut self, langcode: &str) -> Self {
        self.langcode = Some(langcode.to_string());
        self
    }

    pub fn with_scalar_field(mut self, name: &str, value: impl Into<JsonValue>) -> Self {
        self.fields
            .push((name.to_string(), vec![FieldItem::scalar(value)]));
        self
    }

    pub fn with_field(mut self, name: &str, items: Vec<FieldItem>) -> Self {
        self.fields.push((name.to_string(), items));
        self
    }

    pub fn with_reference(mut self, name: &str, target: Arc<dyn ContentEntity>) -> Self {
        self.fields
            .push((name.to_string(), vec![FieldItem::reference(target)]));
        self
    }

    pub fn deny_field(mut self, name: &str) -> Self {
        self.denied_fields.push(name.to_string());
        self
    }

    pub fn as_file(mut self, url: &str) -> Self {
        self.file_url = Some(url.to_string());
        self
    }
}

impl ContentEntity for TestEntity {
    fn entity_type_id(&self) -> &str {
        &self.entity_type
    }

    fn bundle(&self) -> &str {
        &self.bundle
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn langcode(&self) -> Option<&str> {
        self.langcode.as_deref()
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }

    fn field(&self, name: &str) -> Option<Vec<FieldItem>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, items)| items.clone())
    }

    fn field_access(&self, field: &str, _viewer: Option<&Account>) -> bool {
        !self.denied_fields.iter().any(|denied| denied == field)
    }

    fn is_file(&self) -> bool {
        self.file_url.is_some()
    }

    fn file_url(&self) -> Option<String> {
        self.file_url.clone()
    }
}

/// Assembled engine pieces sharing one mapping table and cache.
pub struct Engine {
    pub mappings: Arc<StaticMappings>,
    pub cache: Arc<MemoryCache>,
    pub context_generator: Arc<ContextGenerator>,
    pub normalizer: GraphNormalizer,
}

/// Build an engine over the given mappings and field definitions, rooted at
/// `http://localhost`.
pub fn engine(mappings: StaticMappings, fields: StaticFieldDefinitions) -> Engine {
    let mappings = Arc::new(mappings);
    let cache = Arc::new(MemoryCache::new());
    let context_generator = Arc::new(ContextGenerator::new(
        mappings.clone(),
        Arc::new(fields),
        cache.clone(),
    ));
    let normalizer = GraphNormalizer::new(
        mappings.clone(),
        Arc::new(CanonicalUriBuilder::new("http://localhost")),
        context_generator.clone(),
    );
    Engine {
        mappings,
        cache,
        context_generator,
        normalizer,
    }
}
