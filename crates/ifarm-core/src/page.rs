//! Paginated collection models shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// One page of records as returned by the server.
///
/// `total` is authoritative from the server; local mutations may adjust the
/// cached copy but never re-derive it, a subsequent fetch is the source of
/// truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default = "default_current")]
    pub current: u64,
    #[serde(default = "default_size")]
    pub size: u64,
    #[serde(default)]
    pub total: u64,
}

/// Client-side pagination state for a cached collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u64,
    pub size: u64,
    pub total: u64,
}

fn default_current() -> u64 {
    1
}

fn default_size() -> u64 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            size: 10,
            total: 0,
        }
    }
}

impl Pagination {
    /// Total number of pages implied by `total` and `size`.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(self.size)
    }
}

impl<T> Page<T> {
    /// Pagination state described by this page.
    pub fn pagination(&self) -> Pagination {
        Pagination {
            current: self.current,
            size: self.size,
            total: self.total,
        }
    }
}
