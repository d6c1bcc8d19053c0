//! Catalog API request parameter types.

use url::form_urlencoded;

/// Default number of items per page (matches the server default).
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the server accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Ordered query parameters for a catalog request.
///
/// Keys are unique; pushing an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Sets `key` to `value`, keeping the position of an existing key.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.pairs.push((key, value));
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| *k == key)
    }

    /// Number of parameters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Borrows the raw pairs (for `reqwest::RequestBuilder::query`).
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Encodes as `application/x-www-form-urlencoded` in insertion order.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }

    /// Encodes with keys sorted, so equal parameter sets yield equal keys.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut sorted: Vec<(&str, &str)> = self.iter().collect();
        sorted.sort_unstable();
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(sorted)
            .finish()
    }
}

/// Paging request for the actor and director list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Embed each person's filmography.
    pub include_movies: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            include_movies: false,
        }
    }
}

impl PageRequest {
    /// Creates a request for the given page and size.
    ///
    /// `page` is raised to 1 and `page_size` clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            include_movies: false,
        }
    }

    /// Sets whether filmographies are embedded.
    #[must_use]
    pub const fn include_movies(mut self, include: bool) -> Self {
        self.include_movies = include;
        self
    }

    /// Converts to query parameters. `include_movies` is sent only when set.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push("page", self.page.to_string());
        query.push("page_size", self.page_size.to_string());
        if self.include_movies {
            query.push("include_movies", "true");
        }
        query
    }
}
