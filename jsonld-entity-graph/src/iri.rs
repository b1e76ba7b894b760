/// Parse a compacted IRI like "dc:title" into (prefix, local name).
/// Returns None if the string is not a compacted IRI.
///
/// The rules are deliberately naive, matching the CURIE-ish notion of a
/// compact IRI used by the mapping configuration:
/// - the string must contain a colon;
/// - the part after the first colon must not start with "//" (that pattern
///   marks an already-expanded IRI like "http://example.org/foo").
pub fn parse_compact(iri: &str) -> Option<(&str, &str)> {
    let (prefix, rest) = iri.split_once(':')?;
    if rest.starts_with("//") {
        return None;
    }
    Some((prefix, rest))
}

/// Returns true if the string is treated as an already-expanded IRI
/// (no prefix split is attempted on it).
pub fn is_expanded(iri: &str) -> bool {
    parse_compact(iri).is_none() && iri.contains(':')
}
