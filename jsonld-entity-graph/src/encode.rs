//! Output encoding for the JSON-LD serialization format

use crate::error::Result;
use serde_json::Value as JsonValue;

/// Media type of the serialization
pub const MEDIA_TYPE: &str = "application/ld+json";

/// Format name used in request format selectors
pub const FORMAT: &str = "jsonld";

/// Encode a normalized document as pretty-printed JSON-LD.
pub fn to_pretty_string(document: &JsonValue) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}
