//! Prefix -> namespace IRI table
//!
//! The table is an explicit value threaded through the call chain, not a
//! process-wide registry. Hosts extend the built-in set with a merge step at
//! startup; redefining an existing prefix with a different IRI is rejected.

use crate::error::{JsonldError, Result};
use crate::iri;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Mapping from short prefix ("schema", "dc", "xsd") to full namespace IRI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    map: BTreeMap<String, String>,
}

impl NamespaceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with the built-in prefixes
    pub fn builtin() -> Self {
        let map = jsonld_vocab::namespaces::DEFAULT
            .iter()
            .map(|(prefix, ns)| (prefix.to_string(), ns.to_string()))
            .collect();
        Self { map }
    }

    /// Register or overwrite a single prefix
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.map.insert(prefix.into(), namespace.into());
    }

    /// Merge another table into this one.
    ///
    /// A prefix already present with a different IRI is a configuration
    /// conflict and fails the whole merge; identical redefinitions are fine.
    pub fn merge(&mut self, other: &NamespaceTable) -> Result<()> {
        for (prefix, namespace) in &other.map {
            match self.map.get(prefix) {
                Some(existing) if existing != namespace => {
                    return Err(JsonldError::NamespaceConflict {
                        prefix: prefix.clone(),
                        existing: existing.clone(),
                        incoming: namespace.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    self.map.insert(prefix.clone(), namespace.clone());
                }
            }
        }
        Ok(())
    }

    /// Look up a namespace IRI by prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(String::as_str)
    }

    /// Check whether a prefix is registered
    pub fn contains(&self, prefix: &str) -> bool {
        self.map.contains_key(prefix)
    }

    /// Iterate over (prefix, namespace IRI) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand a compacted predicate to its full IRI form.
    ///
    /// Unknown prefixes and already-expanded IRIs are returned unchanged, so
    /// the compacted form survives into the output when the table cannot
    /// resolve it.
    pub fn expand(&self, compact: &str) -> String {
        match iri::parse_compact(compact) {
            Some((prefix, rest)) => match self.map.get(prefix) {
                Some(namespace) => format!("{namespace}{rest}"),
                None => compact.to_string(),
            },
            None => compact.to_string(),
        }
    }

    /// Serialize the table as a JSON object, suitable for an inline @context
    pub fn to_json(&self) -> JsonValue {
        let entries = self
            .map
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        JsonValue::Object(entries)
    }
}

impl FromIterator<(String, String)> for NamespaceTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_core_prefixes() {
        let table = NamespaceTable::builtin();
        assert_eq!(table.get("xsd"), Some("http://www.w3.org/2001/XMLSchema#"));
        assert_eq!(table.get("dc"), Some("http://purl.org/dc/terms/"));
        assert_eq!(table.get("schema"), Some("http://schema.org/"));
    }

    #[test]
    fn test_expand() {
        let table = NamespaceTable::builtin();
        assert_eq!(table.expand("dc:title"), "http://purl.org/dc/terms/title");
        assert_eq!(
            table.expand("xsd:string"),
            "http://www.w3.org/2001/XMLSchema#string"
        );
        // Unknown prefix survives compacted
        assert_eq!(table.expand("unknown:foo"), "unknown:foo");
        // Already expanded, no split attempted
        assert_eq!(table.expand("http://example.org/foo"), "http://example.org/foo");
        // Plain terms pass through
        assert_eq!(table.expand("Hello"), "Hello");
    }

    #[test]
    fn test_merge_conflict() {
        let mut table = NamespaceTable::builtin();
        let mut extension = NamespaceTable::new();
        extension.insert("dc", "http://example.org/not-dc/");

        let err = table.merge(&extension).unwrap_err();
        assert!(matches!(
            err,
            JsonldError::NamespaceConflict { ref prefix, .. } if prefix == "dc"
        ));
    }

    #[test]
    fn test_merge_extension_and_identical_redefinition() {
        let mut table = NamespaceTable::builtin();
        let mut extension = NamespaceTable::new();
        extension.insert("dc", "http://purl.org/dc/terms/");
        extension.insert("ex", "http://example.org/ns#");

        table.merge(&extension).unwrap();
        assert_eq!(table.get("ex"), Some("http://example.org/ns#"));
    }
}
