//! Alter hooks for the finished document
//!
//! Hooks run once per top-level normalization, after the graph is
//! assembled and flattened, and may rewrite the document in place. The
//! hook list is an explicit constructor argument; registration order is
//! invocation order.

use crate::entity::ContentEntity;
use crate::normalize::NormalizeContext;
use serde_json::Value as JsonValue;

/// A host extension that may alter the normalized document.
pub trait NormalizeAlterHook: Send + Sync {
    fn alter(
        &self,
        entity: &dyn ContentEntity,
        normalized: &mut JsonValue,
        context: &NormalizeContext,
    );
}
