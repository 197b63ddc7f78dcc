//! Page requests and the page envelope returned by list endpoints

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;

/// Raw `page` / `pageSize` query parameters.
///
/// Kept as strings so malformed values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// A resolved page request (1-based page, bounded page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Resolve query parameters against the configured defaults.
    ///
    /// Absent, non-numeric and non-positive values take the default;
    /// `page_size` is clamped to `max_page_size`.
    pub fn resolve(query: &PageQuery, default_page_size: u32, max_page_size: u32) -> Self {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive(query.page_size.as_deref())
            .unwrap_or(default_page_size)
            .min(max_page_size)
            .max(1);

        Self { page, page_size }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Number of rows to take
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value >= 1)
}

/// Page envelope: `{data, total, page, pageSize, totalPages}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total.div_ceil(u64::from(request.page_size)),
        }
    }
}
