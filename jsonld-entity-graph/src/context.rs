//! JSON-LD @context generation from RDF mapping configuration
//!
//! Contexts are derived entirely from the mapping, the field definitions and
//! the namespace table, so a generated document is cached permanently under
//! the mapping's cache tags.

use crate::cache::ContextCache;
use crate::entity::FieldDefinitionSource;
use crate::error::{JsonldError, Result};
use crate::field_types::FieldTypeDefaults;
use crate::iri;
use crate::mapping::{split_mapping_id, MappingSource, MappingType, RdfMapping};
use crate::namespaces::NamespaceTable;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix for context cache keys; the mapping id is appended.
pub const CACHE_BASE_KEY: &str = "jsonld:context:";

/// Generates per-bundle @context documents.
pub struct ContextGenerator {
    mappings: Arc<dyn MappingSource>,
    fields: Arc<dyn FieldDefinitionSource>,
    cache: Arc<dyn ContextCache>,
    namespaces: NamespaceTable,
    field_type_defaults: FieldTypeDefaults,
}

impl ContextGenerator {
    pub fn new(
        mappings: Arc<dyn MappingSource>,
        fields: Arc<dyn FieldDefinitionSource>,
        cache: Arc<dyn ContextCache>,
    ) -> Self {
        Self {
            mappings,
            fields,
            cache,
            namespaces: NamespaceTable::builtin(),
            field_type_defaults: FieldTypeDefaults::default(),
        }
    }

    /// Replace the namespace table (builder style)
    pub fn with_namespaces(mut self, namespaces: NamespaceTable) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Replace the field-type default table (builder style)
    pub fn with_field_type_defaults(mut self, defaults: FieldTypeDefaults) -> Self {
        self.field_type_defaults = defaults;
        self
    }

    /// The namespace table contexts are generated against
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Get the @context document for an `entityType.bundle` id, generating
    /// and caching it on first use.
    pub fn get_context(&self, ids: &str) -> Result<String> {
        let key = format!("{CACHE_BASE_KEY}{ids}");
        if let Some(cached) = self.cache.get(&key) {
            debug!(ids, "JSON-LD context served from cache");
            return Ok(cached);
        }

        let (entity_type, bundle) = split_mapping_id(ids)?;
        let Some(mapping) = self.mappings.mapping(entity_type, bundle) else {
            warn!(ids, "no RDF mapping configured for requested context");
            return Err(JsonldError::MissingMapping { id: ids.to_string() });
        };

        let context = self.generate_context(&mapping)?;
        self.cache.set(&key, context.clone(), &mapping.cache_tags());
        Ok(context)
    }

    /// Generate the @context document for a mapping, as pretty-printed JSON.
    pub fn generate_context(&self, mapping: &RdfMapping) -> Result<String> {
        let (entity_type, bundle) = split_mapping_id(mapping.id())?;
        if mapping.bundle_types().is_empty() {
            warn!(id = mapping.id(), "bundle declares no rdf:type");
            return Err(JsonldError::NoRdfType {
                entity_type: entity_type.to_string(),
                bundle: bundle.to_string(),
            });
        }

        let mut accumulator = Map::new();

        // Prefixes used by the bundle's rdf:type list are declared in the
        // context even when no field maps to them.
        for bundle_type in mapping.bundle_types() {
            if let Some((prefix, _)) = iri::parse_compact(bundle_type) {
                if let Some(namespace) = self.namespaces.get(prefix) {
                    accumulator
                        .insert(prefix.to_string(), JsonValue::String(namespace.to_string()));
                }
            }
        }

        let mut definitions = self.fields.bundle_fields(entity_type, bundle);
        definitions.extend(self.fields.base_fields(entity_type));
        for definition in definitions {
            // Later definitions overwrite earlier ones on key collision
            for (key, value) in self.fields_rdf(mapping, &definition.name, &definition.field_type) {
                accumulator.insert(key, value);
            }
        }

        accumulator.retain(|_, value| !is_empty_value(value));
        let document = json!({ "@context": accumulator });
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Term definitions contributed by one field, resolving its field type
    /// through the bundle and base definitions.
    pub fn field_context(
        &self,
        mapping: &RdfMapping,
        field_name: &str,
    ) -> Result<Map<String, JsonValue>> {
        let (entity_type, bundle) = split_mapping_id(mapping.id())?;
        let field_type = self
            .fields
            .bundle_fields(entity_type, bundle)
            .into_iter()
            .chain(self.fields.base_fields(entity_type))
            .find(|definition| definition.name == field_name)
            .map(|definition| definition.field_type)
            .unwrap_or_else(|| "string".to_string());
        Ok(self.fields_rdf(mapping, field_name, &field_type))
    }

    /// Context fragment for one field: a prefix entry plus a term definition
    /// per mapped predicate. Fields without a usable mapping contribute an
    /// empty fragment.
    fn fields_rdf(
        &self,
        mapping: &RdfMapping,
        field_name: &str,
        field_type: &str,
    ) -> Map<String, JsonValue> {
        let mut fragment = Map::new();
        let Some(field_mapping) = mapping.field_mapping(field_name) else {
            return fragment;
        };
        if field_mapping.is_empty() {
            return fragment;
        }

        for property in &field_mapping.properties {
            let Some((prefix, _)) = iri::parse_compact(property) else {
                debug!(%property, "skipping predicate that is not a compact IRI");
                continue;
            };
            let Some(namespace) = self.namespaces.get(prefix) else {
                debug!(prefix, %property, "skipping predicate with unregistered prefix");
                continue;
            };

            let mut term = Map::new();
            if let Some(datatype) = &field_mapping.datatype {
                term.insert("@type".to_string(), JsonValue::String(datatype.clone()));
            } else if matches!(
                field_mapping.mapping_type,
                MappingType::Rel | MappingType::Rev
            ) {
                term.insert("@type".to_string(), JsonValue::String("@id".to_string()));
            }
            // Missing keys are filled from the field-type defaults; explicit
            // mapping values win.
            if let JsonValue::Object(defaults) = self.field_type_defaults.term_for(field_type) {
                for (key, value) in defaults {
                    term.entry(key).or_insert(value);
                }
            }

            fragment.insert(prefix.to_string(), JsonValue::String(namespace.to_string()));
            fragment.insert(property.clone(), JsonValue::Object(term));
        }
        fragment
    }
}

impl std::fmt::Debug for ContextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextGenerator")
            .field("namespaces", &self.namespaces)
            .field("field_type_defaults", &self.field_type_defaults)
            .finish_non_exhaustive()
    }
}

/// True for values dropped from a finished context: null, empty string,
/// empty collection, false.
fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
        JsonValue::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::entity::StaticFieldDefinitions;
    use crate::mapping::{FieldMapping, StaticMappings};

    fn generator_with(
        mapping: RdfMapping,
        fields: StaticFieldDefinitions,
    ) -> (ContextGenerator, Arc<MemoryCache>) {
        let mappings = StaticMappings::new();
        mappings.insert(mapping);
        let cache = Arc::new(MemoryCache::new());
        let generator =
            ContextGenerator::new(Arc::new(mappings), Arc::new(fields), cache.clone());
        (generator, cache)
    }

    #[test]
    fn test_context_with_datatype_and_prefix() {
        let mapping = RdfMapping::new("entity_test", "entity_test")
            .with_bundle_types(vec!["schema:Thing".to_string()])
            .with_field_mapping(
                "name",
                FieldMapping {
                    properties: vec!["dc:title".to_string()],
                    datatype: Some("xsd:string".to_string()),
                    ..Default::default()
                },
            );
        let mut fields = StaticFieldDefinitions::new();
        fields.add_base_field("entity_test", "name", "string");

        let (generator, _) = generator_with(mapping, fields);
        let document = generator.get_context("entity_test.entity_test").unwrap();
        let parsed: JsonValue = serde_json::from_str(&document).unwrap();

        assert_eq!(
            parsed["@context"]["schema"],
            JsonValue::String("http://schema.org/".to_string())
        );
        assert_eq!(
            parsed["@context"]["dc"],
            JsonValue::String("http://purl.org/dc/terms/".to_string())
        );
        assert_eq!(parsed["@context"]["dc:title"], json!({"@type": "xsd:string"}));
    }

    #[test]
    fn test_no_rdf_type_is_an_error_and_never_cached() {
        let mapping = RdfMapping::new("node", "untyped");
        let (generator, cache) = generator_with(mapping, StaticFieldDefinitions::new());

        let err = generator.get_context("node.untyped").unwrap_err();
        assert!(matches!(err, JsonldError::NoRdfType { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_mapping() {
        let (generator, cache) =
            generator_with(RdfMapping::new("node", "article"), StaticFieldDefinitions::new());

        let err = generator.get_context("node.page").unwrap_err();
        assert!(matches!(err, JsonldError::MissingMapping { ref id } if id == "node.page"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cached_context_survives_mapping_change_until_invalidated() {
        let mapping = RdfMapping::new("node", "article")
            .with_bundle_types(vec!["schema:Article".to_string()]);
        let mappings = Arc::new(StaticMappings::new());
        mappings.insert(mapping);
        let cache = Arc::new(MemoryCache::new());
        let generator = ContextGenerator::new(
            mappings.clone(),
            Arc::new(StaticFieldDefinitions::new()),
            cache.clone(),
        );

        let first = generator.get_context("node.article").unwrap();

        // Mapping changes do not bust the cache by themselves
        mappings.insert(
            RdfMapping::new("node", "article")
                .with_bundle_types(vec!["schema:BlogPosting".to_string()]),
        );
        let stale = generator.get_context("node.article").unwrap();
        assert_eq!(first, stale);

        // Invalidating the mapping's tags forces recomputation
        cache.invalidate_tags(&["rdf_mapping:node.article".to_string()]);
        let fresh = generator.get_context("node.article").unwrap();
        assert!(fresh.contains("BlogPosting"));
    }

    #[test]
    fn test_unregistered_prefix_is_skipped() {
        let mapping = RdfMapping::new("node", "article")
            .with_bundle_types(vec!["schema:Article".to_string()])
            .with_field_mapping(
                "field_custom",
                FieldMapping {
                    properties: vec!["mystery:thing".to_string()],
                    ..Default::default()
                },
            );
        let mut fields = StaticFieldDefinitions::new();
        fields.add_bundle_field("node", "article", "field_custom", "string");

        let (generator, _) = generator_with(mapping, fields);
        let document = generator.get_context("node.article").unwrap();
        let parsed: JsonValue = serde_json::from_str(&document).unwrap();
        assert!(parsed["@context"].get("mystery:thing").is_none());
        assert!(parsed["@context"].get("mystery").is_none());
    }
}
