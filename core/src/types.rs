//! Wire envelopes shared by every endpoint.
//!
//! Single-item responses arrive as `{data, message, success}`. List
//! endpoints put a `{data: [...], pagination}` object inside that envelope.

use serde::{Deserialize, Serialize};

/// The response envelope every endpoint returns on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// Paging descriptor of a list. Always replaced together with the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
            total_pages: 0,
        }
    }
}

impl Pagination {
    /// A single page holding exactly `count` items, as produced for search results.
    pub fn single_page(count: usize) -> Self {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        Self {
            page: 1,
            limit: count,
            total: u64::from(count),
            total_pages: 1,
        }
    }

    /// Same page and limit with `total` replaced and `total_pages` recomputed.
    pub fn with_total(self, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(self.limit.max(1)));
        Self {
            total,
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
            ..self
        }
    }
}

/// One page of a resource list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}
