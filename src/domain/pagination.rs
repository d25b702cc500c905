//! Pagination envelope and request parameters.
//!
//! Every list endpoint answers with `{data, total, page, lastPage}`. Responses
//! are passed through [`Paginated::normalized`] before they reach a slice, so
//! slices can rely on `1 <= page <= last_page` and `data.len() <= limit`.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not specify one.
pub const DEFAULT_LIMIT: u32 = 10;

/// First page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Largest page size the client will request.
pub const MAX_LIMIT: u32 = 50;

/// One page of a server-side list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
}

const fn first_page() -> u32 {
    DEFAULT_PAGE
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: DEFAULT_PAGE,
            last_page: DEFAULT_PAGE,
        }
    }
}

impl<T> Paginated<T> {
    /// Clamps the envelope to its invariants.
    ///
    /// `last_page` is raised to at least 1, `page` is clamped into
    /// `[1, last_page]`, and `data` is truncated to `limit` items.
    #[must_use]
    pub fn normalized(mut self, limit: u32) -> Self {
        self.last_page = self.last_page.max(DEFAULT_PAGE);
        self.page = self.page.clamp(DEFAULT_PAGE, self.last_page);
        let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
        if self.data.len() > limit {
            tracing::debug!(
                received = self.data.len(),
                limit = limit,
                "truncating oversized page"
            );
            self.data.truncate(limit);
        }
        self
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > DEFAULT_PAGE
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.last_page
    }
}

/// Page selection for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// Builds params with `page >= 1` and `limit` clamped into `[1, MAX_LIMIT]`.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// The same page size, one page further.
    #[must_use]
    pub fn next(self) -> Self {
        Self::new(self.page.saturating_add(1), self.limit)
    }

    /// Query-string pairs in the order the API documents them.
    #[must_use]
    pub fn query_pairs(self) -> [(&'static str, String); 2] {
        [("limit", self.limit.to_string()), ("page", self.page.to_string())]
    }
}

/// A free-text post search with paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(flatten)]
    pub page: PageParams,
}

impl SearchParams {
    #[must_use]
    pub fn new(query: impl Into<String>, page: PageParams) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}
