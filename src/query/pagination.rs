//! Pagination metadata and row window arithmetic.

use serde::Serialize;

/// Page information returned alongside a list of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: u64,
    pub page_size: u64,
    pub first_page: u64,
    pub last_page: u64,
    pub total_records: u64,
}

impl Metadata {
    /// Metadata for a page of a result set with `total_records` matches.
    /// All fields are zero when nothing matched.
    pub fn compute(total_records: u64, page: u64, page_size: u64) -> Self {
        if total_records == 0 || page_size == 0 {
            return Self::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: total_records.div_ceil(page_size),
            total_records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

/// Row `(offset, limit)` for a 1-based page.
///
/// `page` is validated to be at least 1 and bounded before this is called.
pub fn offset_limit(page: u64, page_size: u64) -> (u64, u64) {
    (page.saturating_sub(1).saturating_mul(page_size), page_size)
}
