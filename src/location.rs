//! Location value type: a slash-delimited path plus parsed query parameters.
//!
//! A location is the navigable address the host hands to the resolver, e.g.
//! `/family/42?tab=photos`. Query parsing uses `url::form_urlencoded` so
//! percent-encoded values round-trip correctly.

use std::collections::HashMap;
use std::fmt;

/// A parsed navigable address: path component plus ordered query pairs.
///
/// The path is kept verbatim (normalized to a leading slash); query pairs
/// preserve declaration order so re-serialization is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    /// Parse a location string such as `/a/b?x=1&y=2`.
    ///
    /// An empty input or missing leading slash is normalized: `""` becomes
    /// `/`, `a/b` becomes `/a/b`. Query pairs are percent-decoded.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let (raw_path, raw_query) = match location.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (location, None),
        };

        let path = if raw_path.is_empty() {
            "/".to_string()
        } else if raw_path.starts_with('/') {
            raw_path.to_string()
        } else {
            format!("/{raw_path}")
        };

        let query = raw_query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self { path, query }
    }

    /// The path component, always with a leading slash.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs in declaration order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Query parameters as a map. Duplicate keys: last write wins, matching
    /// parameter lookup semantics elsewhere in the crate.
    #[must_use]
    pub fn query_map(&self) -> HashMap<String, String> {
        self.query.iter().cloned().collect()
    }

    /// True when the path is the bare root `/` with no query.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path == "/" && self.query.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        if !self.query.is_empty() {
            let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            write!(f, "?{encoded}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn test_plain_path() {
        let loc = Location::parse("/a/b");
        assert_eq!(loc.path(), "/a/b");
        assert!(loc.query().is_empty());
    }

    #[test]
    fn test_query_pairs() {
        let loc = Location::parse("/a?x=1&y=two");
        assert_eq!(loc.path(), "/a");
        assert_eq!(loc.query_map().get("x").map(String::as_str), Some("1"));
        assert_eq!(loc.query_map().get("y").map(String::as_str), Some("two"));
    }

    #[test]
    fn test_normalizes_missing_slash() {
        assert_eq!(Location::parse("a/b").path(), "/a/b");
        assert_eq!(Location::parse("").path(), "/");
    }

    #[test]
    fn test_percent_decoding_round_trip() {
        let loc = Location::parse("/search?q=a%20b");
        assert_eq!(loc.query_map().get("q").map(String::as_str), Some("a b"));
        assert_eq!(Location::parse(&loc.to_string()), loc);
    }

    #[test]
    fn test_display_without_query() {
        assert_eq!(Location::parse("/a/b").to_string(), "/a/b");
    }
}
