//! Named value-conversion callbacks
//!
//! Mapping configuration refers to callbacks by name; the registry resolves
//! the name at normalization time. Value callbacks transform a scalar field
//! item, reference callbacks derive a value from a resolved target entity.

use crate::entity::ContentEntity;
use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Transforms a scalar field item's raw values into the emitted `@value`.
pub type ValueCallback =
    Arc<dyn Fn(&Map<String, JsonValue>, Option<&JsonValue>) -> JsonValue + Send + Sync>;

/// Derives the emitted value from a reference target entity.
pub type ReferenceCallback =
    Arc<dyn Fn(&dyn ContentEntity, Option<&JsonValue>) -> JsonValue + Send + Sync>;

/// Registry resolving callback names from mapping configuration.
#[derive(Default)]
pub struct CallbackRegistry {
    values: HashMap<String, ValueCallback>,
    references: HashMap<String, ReferenceCallback>,
}

impl CallbackRegistry {
    /// An empty registry with no callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in callbacks
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_value("date_iso8601", Arc::new(date_iso8601));
        registry.register_reference("link_field_passthrough", Arc::new(link_field_passthrough));
        registry
    }

    pub fn register_value(&mut self, name: impl Into<String>, callback: ValueCallback) {
        self.values.insert(name.into(), callback);
    }

    pub fn register_reference(&mut self, name: impl Into<String>, callback: ReferenceCallback) {
        self.references.insert(name.into(), callback);
    }

    pub fn value(&self, name: &str) -> Option<&ValueCallback> {
        self.values.get(name)
    }

    pub fn reference(&self, name: &str) -> Option<&ReferenceCallback> {
        self.references.get(name)
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .field("references", &self.references.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Format an epoch-seconds timestamp as an ISO 8601 / RFC 3339 string in
/// UTC with an explicit `+00:00` offset. Unparseable input passes through
/// unchanged.
fn date_iso8601(values: &Map<String, JsonValue>, _arguments: Option<&JsonValue>) -> JsonValue {
    let Some(raw) = values.get("value") else {
        return JsonValue::Null;
    };
    let timestamp = match raw {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.parse::<i64>().ok(),
        _ => None,
    };
    match timestamp.and_then(|t| Utc.timestamp_opt(t, 0).single()) {
        Some(datetime) => {
            JsonValue::String(datetime.to_rfc3339_opts(SecondsFormat::Secs, false))
        }
        None => raw.clone(),
    }
}

/// Pass a field of the referenced entity through instead of embedding it.
///
/// Resolution order: the configured `link_field`'s `uri` value, then the
/// target's `name` field, then the target id when `pass_target_id` is set,
/// then the empty string.
fn link_field_passthrough(target: &dyn ContentEntity, arguments: Option<&JsonValue>) -> JsonValue {
    let link_field = arguments
        .and_then(|a| a.get("link_field"))
        .and_then(JsonValue::as_str);
    if let Some(field) = link_field {
        if let Some(items) = target.field(field) {
            if let Some(uri) = items
                .first()
                .and_then(|item| item.values.get("uri"))
                .and_then(JsonValue::as_str)
            {
                return JsonValue::String(uri.to_string());
            }
        }
    }

    if let Some(items) = target.field("name") {
        if let Some(name) = items
            .first()
            .and_then(|item| item.value())
            .and_then(JsonValue::as_str)
        {
            return JsonValue::String(name.to_string());
        }
    }

    let pass_target_id = arguments
        .and_then(|a| a.get("pass_target_id"))
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);
    if pass_target_id {
        return JsonValue::String(target.id().to_string());
    }
    JsonValue::String(String::new())
}
