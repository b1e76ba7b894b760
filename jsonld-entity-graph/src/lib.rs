//! JSON-LD serialization of content entities, driven by RDF mapping
//! configuration.
//!
//! The engine has two halves. The [`context::ContextGenerator`] turns an
//! entity-type/bundle's RDF mapping into a cached JSON-LD `@context`
//! document. The [`normalize::GraphNormalizer`] walks an entity's fields
//! against the same mapping and assembles a `@graph` document, embedding
//! referenced entities as additional nodes.
//!
//! The host system supplies its entity model through the traits in
//! [`entity`], its mapping configuration through [`mapping::MappingSource`],
//! and URI construction through [`uri::EntityUriBuilder`].

pub mod cache;
pub mod callbacks;
pub mod context;
pub mod dedup;
pub mod encode;
pub mod entity;
pub mod error;
pub mod field_types;
pub mod graph;
pub mod hooks;
pub mod iri;
pub mod mapping;
pub mod namespaces;
pub mod normalize;
mod reference;
pub mod uri;
mod value;

pub use cache::{ContextCache, MemoryCache, NullCache};
pub use callbacks::CallbackRegistry;
pub use context::ContextGenerator;
pub use entity::{Account, ContentEntity, FieldDefinition, FieldDefinitionSource, FieldItem,
    StaticFieldDefinitions};
pub use error::{JsonldError, Result};
pub use field_types::FieldTypeDefaults;
pub use hooks::NormalizeAlterHook;
pub use mapping::{DatatypeCallback, FieldMapping, MappingSource, MappingType, RdfMapping,
    StaticMappings, TypeRegistry};
pub use namespaces::NamespaceTable;
pub use normalize::{GraphNormalizer, NormalizeContext, NormalizeOptions};
pub use uri::{CanonicalUriBuilder, EntityUriBuilder};
