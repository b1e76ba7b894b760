//! Error types for jsonld-entity-graph

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, JsonldError>;

/// Engine error type
///
/// The configuration errors (`NoRdfType`, `MissingMapping`) are deterministic
/// and non-transient: the engine never retries them, and the host is expected
/// to surface the display message to the caller.
#[derive(Error, Debug)]
pub enum JsonldError {
    /// Bundle has no declared rdf:type, so no @context can be generated
    #[error("can't generate JSON-LD context without at least one rdf:type for entity type {entity_type}, bundle {bundle}")]
    NoRdfType { entity_type: String, bundle: String },

    /// No RDF mapping configuration exists for the requested bundle
    #[error("can't generate JSON-LD context for {id} without an RDF mapping present")]
    MissingMapping { id: String },

    /// A mapping id was not of the `entityType.bundle` form
    #[error("invalid mapping id '{id}': expected entityType.bundle")]
    InvalidMappingId { id: String },

    /// A prefix was redefined with a different namespace IRI
    #[error("namespace prefix '{prefix}' already maps to {existing}, refusing to remap to {incoming}")]
    NamespaceConflict {
        prefix: String,
        existing: String,
        incoming: String,
    },

    /// An inbound type URI does not match any known entity type/bundle
    #[error("type {uri} does not correspond to a known entity type")]
    UnresolvedTypeLink { uri: String },

    /// Inbound data lacks the required type link relation
    #[error("the type link relation must be specified")]
    MissingRequiredLinkRelation,

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cache backend error
    #[error("cache error: {0}")]
    Cache(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl JsonldError {
    /// Create a cache error
    pub fn cache(msg: impl Into<String>) -> Self {
        JsonldError::Cache(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        JsonldError::Other(msg.into())
    }
}
