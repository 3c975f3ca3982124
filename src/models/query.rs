//! Search query text and its normalization.

use serde::{Deserialize, Serialize};

/// Command token every submitted search must start with.
pub const SEARCH_COMMAND: &str = "search";

/// Anchor a search string with the `search` command.
///
/// Text that already starts with `search` is returned unchanged, anything
/// else gets `"search "` prepended. Applying this twice yields the same text
/// as applying it once.
///
/// The check is a plain prefix match with no word boundary, so the bare
/// command `"search"` and text such as `"searchfoo"` pass through as-is and
/// do not gain a trailing space.
pub fn normalize(text: &str) -> String {
    if text.starts_with(SEARCH_COMMAND) {
        text.to_string()
    } else {
        format!("{} {}", SEARCH_COMMAND, text)
    }
}

/// A search query whose text is always in normalized form.
///
/// The inner text is private so every assignment goes through [`normalize`].
/// An empty query stays empty, which lets job submission detect that no query
/// was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Create a query from raw text
    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut query = Self::default();
        query.set(raw);
        query
    }

    /// Replace the query text, normalizing it
    pub fn set(&mut self, raw: impl AsRef<str>) {
        let raw = raw.as_ref();
        self.text = if raw.is_empty() {
            String::new()
        } else {
            normalize(raw)
        };
    }

    /// The normalized text that is transmitted
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<String> for SearchQuery {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<SearchQuery> for String {
    fn from(query: SearchQuery) -> Self {
        query.text
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prepends_command() {
        assert_eq!(
            normalize("* earliest=-24h | stats count by sourcetype"),
            "search * earliest=-24h | stats count by sourcetype"
        );
    }

    #[test]
    fn test_normalize_passes_through_anchored_query() {
        assert_eq!(normalize("search index=main"), "search index=main");
        // Only the prefix is checked, not a word boundary
        assert_eq!(normalize("searchfoo"), "searchfoo");
    }

    #[test]
    fn test_normalize_bare_command_passes_through() {
        assert_eq!(normalize("search"), "search");
        assert_eq!(normalize(&normalize("search")), "search");
        assert_eq!(SearchQuery::new("search").as_str(), "search");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            " ",
            "index=main",
            "search index=main",
            "Search index=main",
            "| tstats count",
            "search",
            "sea",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample: {:?}", sample);
            assert!(once.starts_with("search"), "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_normalize_is_case_sensitive() {
        assert_eq!(normalize("Search x"), "search Search x");
    }

    #[test]
    fn test_search_query_setter_normalizes() {
        let mut query = SearchQuery::new("index=main");
        assert_eq!(query.as_str(), "search index=main");

        query.set("error | head 5");
        assert_eq!(query.as_str(), "search error | head 5");

        query.set("search already anchored");
        assert_eq!(query.as_str(), "search already anchored");
    }

    #[test]
    fn test_search_query_empty_stays_empty() {
        let query = SearchQuery::new("");
        assert!(query.is_empty());
        assert_eq!(query.as_str(), "");
    }

    #[test]
    fn test_search_query_deserialize_normalizes() {
        let query: SearchQuery = serde_json::from_str(r#""index=_internal""#).unwrap();
        assert_eq!(query.as_str(), "search index=_internal");
        assert_eq!(query.to_string(), "search index=_internal");
    }
}
