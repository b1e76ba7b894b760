//! Canonical entity URI construction

use crate::entity::ContentEntity;

/// Builds absolute URIs for entities and the fallback type URI used when a
/// bundle declares no rdf:type.
pub trait EntityUriBuilder: Send + Sync {
    /// Absolute URI of the entity's canonical route
    fn entity_uri(&self, entity: &dyn ContentEntity) -> String;

    /// Host-generated type URI for an entity-type/bundle pair
    fn type_uri(&self, entity_type: &str, bundle: &str) -> String;
}

/// Default URI builder based on a site base URL.
///
/// Entities resolve to `{base}/{entity_type}/{id}` with a `?_format=jsonld`
/// selector appended unless disabled; file entities use their direct file
/// URL instead of a route.
#[derive(Debug, Clone)]
pub struct CanonicalUriBuilder {
    base_url: String,
    append_format: bool,
}

impl CanonicalUriBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            append_format: true,
        }
    }

    /// Disable the `?_format=jsonld` selector on canonical URIs
    pub fn without_format_selector(mut self) -> Self {
        self.append_format = false;
        self
    }
}

impl EntityUriBuilder for CanonicalUriBuilder {
    fn entity_uri(&self, entity: &dyn ContentEntity) -> String {
        if entity.is_file() {
            return entity.file_url().unwrap_or_default();
        }
        let mut uri = format!(
            "{}/{}/{}",
            self.base_url,
            entity.entity_type_id(),
            entity.id()
        );
        if self.append_format {
            uri.push_str("?_format=jsonld");
        }
        uri
    }

    fn type_uri(&self, entity_type: &str, bundle: &str) -> String {
        format!("{}/rest/type/{entity_type}/{bundle}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldItem;

    #[derive(Debug)]
    struct Dummy {
        file: bool,
    }

    impl ContentEntity for Dummy {
        fn entity_type_id(&self) -> &str {
            if self.file {
                "file"
            } else {
                "node"
            }
        }
        fn bundle(&self) -> &str {
            "article"
        }
        fn id(&self) -> &str {
            "1"
        }
        fn uuid(&self) -> &str {
            "c15a1f66-0000-0000-0000-000000000001"
        }
        fn field_names(&self) -> Vec<String> {
            vec![]
        }
        fn field(&self, _name: &str) -> Option<Vec<FieldItem>> {
            None
        }
        fn is_file(&self) -> bool {
            self.file
        }
        fn file_url(&self) -> Option<String> {
            self.file
                .then(|| "http://localhost/files/photo.jpg".to_string())
        }
    }

    #[test]
    fn test_entity_uri_with_format_selector() {
        let uris = CanonicalUriBuilder::new("https://example.org/");
        assert_eq!(
            uris.entity_uri(&Dummy { file: false }),
            "https://example.org/node/1?_format=jsonld"
        );
    }

    #[test]
    fn test_entity_uri_without_format_selector() {
        let uris = CanonicalUriBuilder::new("https://example.org").without_format_selector();
        assert_eq!(uris.entity_uri(&Dummy { file: false }), "https://example.org/node/1");
    }

    #[test]
    fn test_file_entity_uses_file_url() {
        let uris = CanonicalUriBuilder::new("https://example.org");
        assert_eq!(
            uris.entity_uri(&Dummy { file: true }),
            "http://localhost/files/photo.jpg"
        );
    }

    #[test]
    fn test_type_uri() {
        let uris = CanonicalUriBuilder::new("http://localhost");
        assert_eq!(uris.type_uri("user", "user"), "http://localhost/rest/type/user/user");
    }
}
