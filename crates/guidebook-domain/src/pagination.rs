//! Pagination request/response types.

use serde::{Deserialize, Serialize};

/// One-based page number requested by a list endpoint.
///
/// Page size is fixed per endpoint, so only the page travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u64) -> Self {
        Self { page }.clamped()
    }

    /// Clamp `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
        }
    }

    /// Zero-based page index, as expected by sea-orm paginators.
    pub fn index(self) -> u64 {
        self.clamped().page - 1
    }
}

/// A page of results plus the metadata needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    /// Build a page; `pages` is derived from `total` and `per_page`.
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            items,
            page,
            per_page,
            pages,
            total,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            pages: self.pages,
            total: self.total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
