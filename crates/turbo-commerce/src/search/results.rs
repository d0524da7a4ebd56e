//! Catalog view and pagination.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total number of matching items.
    pub total: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether matches remain past this page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: total > page.saturating_mul(per_page),
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Index one past the last item on this page.
    pub fn end(&self) -> usize {
        self.page.saturating_mul(self.per_page)
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        self.end().min(self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 20, 0)
    }
}

/// One page of the filtered, sorted catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogView {
    /// Products on this page.
    pub items: Vec<Product>,
    /// Pagination info.
    pub pagination: Pagination,
}

impl CatalogView {
    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next
    }

    /// Matches across all pages.
    pub fn total_matches(&self) -> usize {
        self.pagination.total
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
