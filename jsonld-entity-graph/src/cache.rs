//! Context cache contract
//!
//! Generated `@context` documents are pure functions of the mapping
//! configuration, so entries are permanent: no TTL, invalidated only through
//! their tags when the mapping changes. Concurrent population races are
//! last-write-wins; recomputation is a performance cost, never a correctness
//! hazard.

use std::collections::HashMap;
use std::sync::RwLock;

/// Cache backend contract required by the context generator.
pub trait ContextCache: Send + Sync {
    /// Get a cached document by key
    fn get(&self, key: &str) -> Option<String>;

    /// Store a document permanently under `key`, associated with
    /// invalidation tags
    fn set(&self, key: &str, value: String, tags: &[String]);

    /// Drop every entry carrying any of the given tags
    fn invalidate_tags(&self, tags: &[String]);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    tags: Vec<String>,
}

/// Simple in-memory tag-aware cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContextCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .map(|entry| entry.data.clone())
    }

    fn set(&self, key: &str, value: String, tags: &[String]) {
        self.entries.write().unwrap().insert(
            key.to_string(),
            CacheEntry {
                data: value,
                tags: tags.to_vec(),
            },
        );
    }

    fn invalidate_tags(&self, tags: &[String]) {
        self.entries
            .write()
            .unwrap()
            .retain(|_, entry| !entry.tags.iter().any(|tag| tags.contains(tag)));
    }
}

/// A no-op cache that never stores anything. Useful for testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl ContextCache for NullCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: String, _tags: &[String]) {}

    fn invalidate_tags(&self, _tags: &[String]) {}
}
