//! Question list parameters: sort orders, keyword filter, pagination.

use serde::{Deserialize, Serialize};

/// Questions per list page.
pub const PAGE_SIZE: u64 = 10;

/// Sort orders for the question list, from the `so` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Descending creation time.
    #[default]
    Recent,
    /// Descending voter count, newest first on ties.
    Recommend,
    /// Descending answer count, newest first on ties.
    Popular,
}

impl SortOrder {
    /// Parse the query parameter value; anything unrecognized means
    /// `Recent`, matching the original's fallthrough.
    pub fn parse(s: &str) -> Self {
        match s {
            "recommend" => SortOrder::Recommend,
            "popular" => SortOrder::Popular,
            _ => SortOrder::Recent,
        }
    }
}

/// Parameters for one question-list request.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Requested page, 1-based. Repositories clamp it into range.
    pub page: u64,
    /// Keyword filter; `None` means no filtering.
    pub keyword: Option<String>,
    pub sort: SortOrder,
}

impl ListParams {
    /// Build parameters, discarding blank keywords so an empty `kw` query
    /// parameter applies no filter.
    pub fn new(page: u64, keyword: Option<String>, sort: SortOrder) -> Self {
        let keyword = keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            page,
            keyword,
            sort,
        }
    }
}

/// One page of results plus the paging facts a client renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually served, after clamping.
    pub page: u64,
    pub page_count: u64,
    pub total: u64,
}

/// Number of pages needed for `total` items, never less than one: an
/// empty result set still renders as an empty page 1.
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Clamp a requested page to the nearest valid page instead of erroring.
pub fn clamp_page(requested: u64, total: u64) -> u64 {
    requested.clamp(1, page_count(total))
}
