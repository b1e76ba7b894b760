//! Entity-to-graph normalization
//!
//! The normalizer walks an entity's fields against its RDF mapping and
//! assembles a JSON-LD document with a top-level `@graph`. Referenced
//! entities are embedded as additional graph nodes; the recursion carries a
//! [`NormalizeContext`] so embedded entities know they are not the document
//! root.

use crate::callbacks::CallbackRegistry;
use crate::context::ContextGenerator;
use crate::dedup::deduplicate_types_and_references;
use crate::entity::{Account, ContentEntity, FieldItem};
use crate::error::Result;
use crate::graph::{flatten_graph, graph_fragment, merge_deep};
use crate::hooks::NormalizeAlterHook;
use crate::mapping::{MappingSource, RdfMapping};
use crate::namespaces::NamespaceTable;
use crate::uri::EntityUriBuilder;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::debug;

/// Caller-facing options for one normalization call.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Viewer identity for field-access checks; None means anonymous
    pub account: Option<Account>,
    /// Restrict serialization to these fields
    pub included_fields: Option<Vec<String>>,
    /// Emit an inline `@context` and keep IRIs compacted instead of
    /// expanding them
    pub needs_context: bool,
    /// Keep `@graph` in its keyed form instead of flattening, for callers
    /// merging the result into a larger document
    pub embedded: bool,
    /// Language override; defaults to the entity's own langcode
    pub langcode: Option<String>,
    /// Namespace table override; defaults to the context generator's table
    pub namespaces: Option<NamespaceTable>,
}

/// Per-call state threaded through the normalization recursion.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// 0 for the document root, incremented per embedding level
    pub depth: u32,
    /// True while normalizing a referenced entity into a parent graph
    pub embedded: bool,
    pub needs_context: bool,
    pub included_fields: Option<Vec<String>>,
    pub account: Option<Account>,
    pub langcode: Option<String>,
    /// `@id` of the entity currently being serialized
    pub current_entity_id: String,
    pub current_mapping: Option<Arc<RdfMapping>>,
    pub namespaces: NamespaceTable,
}

/// Serializes content entities to JSON-LD graph documents.
pub struct GraphNormalizer {
    pub(crate) mappings: Arc<dyn MappingSource>,
    pub(crate) uris: Arc<dyn EntityUriBuilder>,
    pub(crate) context_generator: Arc<ContextGenerator>,
    pub(crate) callbacks: CallbackRegistry,
    pub(crate) hooks: Vec<Arc<dyn NormalizeAlterHook>>,
}

impl GraphNormalizer {
    pub fn new(
        mappings: Arc<dyn MappingSource>,
        uris: Arc<dyn EntityUriBuilder>,
        context_generator: Arc<ContextGenerator>,
    ) -> Self {
        Self {
            mappings,
            uris,
            context_generator,
            callbacks: CallbackRegistry::with_builtins(),
            hooks: Vec::new(),
        }
    }

    /// Replace the callback registry (builder style)
    pub fn with_callbacks(mut self, callbacks: CallbackRegistry) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Append an alter hook; hooks run in registration order
    pub fn with_hook(mut self, hook: Arc<dyn NormalizeAlterHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Normalize an entity into a JSON-LD document.
    pub fn normalize(
        &self,
        entity: &dyn ContentEntity,
        options: NormalizeOptions,
    ) -> Result<JsonValue> {
        let namespaces = options
            .namespaces
            .unwrap_or_else(|| self.context_generator.namespaces().clone());
        let langcode = options
            .langcode
            .or_else(|| entity.langcode().map(str::to_string));
        let context = NormalizeContext {
            depth: 0,
            embedded: options.embedded,
            needs_context: options.needs_context,
            included_fields: options.included_fields,
            account: options.account,
            langcode,
            current_entity_id: String::new(),
            current_mapping: None,
            namespaces,
        };
        self.normalize_entity(entity, context)
    }

    /// Normalize one entity within an existing context. Embedded calls
    /// arrive here recursively from reference handling.
    pub(crate) fn normalize_entity(
        &self,
        entity: &dyn ContentEntity,
        mut context: NormalizeContext,
    ) -> Result<JsonValue> {
        let entity_uri = self.uris.entity_uri(entity);
        debug!(
            entity_type = entity.entity_type_id(),
            bundle = entity.bundle(),
            depth = context.depth,
            "normalizing entity"
        );
        context.current_entity_id = entity_uri.clone();

        let mapping = self
            .mappings
            .mapping(entity.entity_type_id(), entity.bundle());
        context.current_mapping = mapping.clone();

        // rdf:types from the mapping, or a host type URI string when the
        // bundle declares none. The fallback is a bare string and is never
        // expanded.
        let types = match &mapping {
            Some(m) if !m.bundle_types().is_empty() => {
                let list = m
                    .bundle_types()
                    .iter()
                    .map(|t| {
                        if context.needs_context {
                            t.clone()
                        } else {
                            context.namespaces.expand(t)
                        }
                    })
                    .map(JsonValue::String)
                    .collect();
                JsonValue::Array(list)
            }
            _ => JsonValue::String(
                self.uris
                    .type_uri(entity.entity_type_id(), entity.bundle()),
            ),
        };

        let mut node = Map::new();
        node.insert("@id".to_string(), JsonValue::String(entity_uri.clone()));
        node.insert("@type".to_string(), types);

        let mut document = Map::new();
        if context.needs_context {
            // The inline @context is the namespace table itself, not the
            // generated per-bundle context, so entities without a mapping
            // still serialize in this mode.
            document.insert("@context".to_string(), context.namespaces.to_json());
        }
        let mut graph = Map::new();
        graph.insert(entity_uri, JsonValue::Object(node));
        document.insert("@graph".to_string(), JsonValue::Object(graph));
        let mut document = JsonValue::Object(document);

        if let Some(mapping) = &mapping {
            for field_name in entity.field_names() {
                if let Some(included) = &context.included_fields {
                    if !included.contains(&field_name) {
                        continue;
                    }
                }
                let Some(field_mapping) = mapping.field_mapping(&field_name) else {
                    continue;
                };
                if field_mapping.is_empty() {
                    continue;
                }
                if !entity.field_access(&field_name, context.account.as_ref()) {
                    continue;
                }
                let Some(items) = entity.field(&field_name) else {
                    continue;
                };

                for item in items {
                    let fragment = match item.target.clone() {
                        Some(target) => self.normalize_reference(
                            target.as_ref(),
                            field_mapping,
                            &context,
                        )?,
                        None => {
                            let item = self.adjust_file_uri(entity, &field_name, item);
                            let properties = self.normalize_field_item(
                                &field_name,
                                &item,
                                field_mapping,
                                mapping,
                                &context,
                            )?;
                            if properties.is_empty() {
                                continue;
                            }
                            graph_fragment(&context.current_entity_id, properties)
                        }
                    };
                    merge_deep(&mut document, fragment);
                    deduplicate_types_and_references(&mut document);
                }
            }
        }

        if !context.embedded {
            flatten_graph(&mut document);
        }
        if context.depth == 0 {
            for hook in &self.hooks {
                hook.alter(entity, &mut document, &context);
            }
        }
        Ok(document)
    }

    /// File entities serialize their `uri` field as the direct file URL
    /// rather than the internal stream wrapper value.
    fn adjust_file_uri(
        &self,
        entity: &dyn ContentEntity,
        field_name: &str,
        item: FieldItem,
    ) -> FieldItem {
        if entity.is_file() && field_name == "uri" {
            let mut adjusted = item;
            adjusted.values.insert(
                "value".to_string(),
                JsonValue::String(self.uris.entity_uri(entity)),
            );
            return adjusted;
        }
        item
    }
}

impl std::fmt::Debug for GraphNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphNormalizer")
            .field("callbacks", &self.callbacks)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}
