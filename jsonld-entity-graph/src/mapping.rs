//! RDF mapping configuration
//!
//! An [`RdfMapping`] associates one entity-type/bundle pair with a list of
//! rdf:type IRIs and per-field predicate mappings. The engine treats this
//! configuration as read-only input supplied by the host through a
//! [`MappingSource`].

use crate::error::{JsonldError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// How a field's predicates relate subject and object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingType {
    /// Plain literal-valued property
    #[default]
    Property,
    /// Forward relation to another resource
    Rel,
    /// Reverse relation from another resource
    Rev,
}

/// A named value-conversion callback with optional configured arguments.
///
/// The callable name is resolved against the registry in
/// [`crate::callbacks::CallbackRegistry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatatypeCallback {
    pub callable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<JsonValue>,
}

/// Per-field mapping: which predicates the field serializes to and how.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Compact IRIs this field's values are emitted under. One field may
    /// fan out to several predicates; each is treated independently.
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub mapping_type: MappingType,
    /// Literal datatype (compact IRI), if declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype_callback: Option<DatatypeCallback>,
}

impl FieldMapping {
    /// A mapping with no predicates contributes nothing to the output.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// RDF mapping for one entity-type/bundle pair.
#[derive(Debug, Clone, Default)]
pub struct RdfMapping {
    id: String,
    bundle_types: Vec<String>,
    field_mappings: HashMap<String, FieldMapping>,
}

impl RdfMapping {
    /// Create an empty mapping for `entity_type.bundle`
    pub fn new(entity_type: &str, bundle: &str) -> Self {
        Self {
            id: format!("{entity_type}.{bundle}"),
            ..Default::default()
        }
    }

    /// The `entityType.bundle` id this mapping is keyed by
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the rdf:type list for the bundle (builder style)
    pub fn with_bundle_types(mut self, types: Vec<String>) -> Self {
        self.bundle_types = types;
        self
    }

    /// Set one field's mapping (builder style)
    pub fn with_field_mapping(mut self, field: impl Into<String>, mapping: FieldMapping) -> Self {
        self.field_mappings.insert(field.into(), mapping);
        self
    }

    /// The rdf:type IRIs declared for the bundle
    pub fn bundle_types(&self) -> &[String] {
        &self.bundle_types
    }

    /// Look up the mapping for a field. Fields without a mapping are not
    /// serialized as RDF.
    pub fn field_mapping(&self, field: &str) -> Option<&FieldMapping> {
        self.field_mappings.get(field)
    }

    /// Cache tags that invalidate anything derived from this mapping
    pub fn cache_tags(&self) -> Vec<String> {
        vec![format!("rdf_mapping:{}", self.id)]
    }
}

/// Split a joint `entityType.bundle` id string.
pub fn split_mapping_id(id: &str) -> Result<(&str, &str)> {
    id.split_once('.')
        .ok_or_else(|| JsonldError::InvalidMappingId { id: id.to_string() })
}

/// Source of RDF mapping configuration, supplied by the host.
pub trait MappingSource: Send + Sync {
    /// Get the mapping for an entity-type/bundle pair, if one is configured
    fn mapping(&self, entity_type: &str, bundle: &str) -> Option<Arc<RdfMapping>>;
}

/// In-memory [`MappingSource`] backed by a mutable table.
///
/// Interior mutability lets a host (or test) replace a mapping after the
/// fact; cached contexts derived from the old mapping stay valid until their
/// tags are invalidated.
#[derive(Debug, Default)]
pub struct StaticMappings {
    map: RwLock<HashMap<String, Arc<RdfMapping>>>,
}

impl StaticMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a mapping, keyed by its own id
    pub fn insert(&self, mapping: RdfMapping) {
        self.map
            .write()
            .unwrap()
            .insert(mapping.id().to_string(), Arc::new(mapping));
    }
}

impl MappingSource for StaticMappings {
    fn mapping(&self, entity_type: &str, bundle: &str) -> Option<Arc<RdfMapping>> {
        self.map
            .read()
            .unwrap()
            .get(&format!("{entity_type}.{bundle}"))
            .cloned()
    }
}

/// Registry of known type URIs for resolving inbound documents.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_uri: HashMap<String, (String, String)>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a type URI with an entity-type/bundle pair
    pub fn register(
        &mut self,
        uri: impl Into<String>,
        entity_type: impl Into<String>,
        bundle: impl Into<String>,
    ) {
        self.by_uri
            .insert(uri.into(), (entity_type.into(), bundle.into()));
    }

    /// Resolve a type URI to its entity-type/bundle pair
    pub fn resolve(&self, uri: &str) -> Option<&(String, String)> {
        self.by_uri.get(uri)
    }
}

/// Resolve candidate type-link URIs from an inbound document against the
/// registry. The first matching URI wins.
///
/// An empty candidate list is a missing required relation; a non-empty list
/// with no match is an unresolved type link. Both are fatal to the call.
pub fn resolve_type_links(uris: &[String], registry: &TypeRegistry) -> Result<(String, String)> {
    if uris.is_empty() {
        return Err(JsonldError::MissingRequiredLinkRelation);
    }
    let mut last = "";
    for uri in uris {
        if let Some((entity_type, bundle)) = registry.resolve(uri) {
            return Ok((entity_type.clone(), bundle.clone()));
        }
        last = uri;
    }
    Err(JsonldError::UnresolvedTypeLink {
        uri: last.to_string(),
    })
}
