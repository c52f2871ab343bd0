//! Page-based pagination.

use serde::{Deserialize, Serialize};

/// A 1-based page index and a page size.
///
/// Page indices below 1 are treated as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: i64,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Default number of records per page.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Returns a new [`Pagination`].
    #[inline]
    pub fn new(page_index: i64, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Returns the page index floored at 1.
    #[inline]
    pub fn page(&self) -> u64 {
        self.page_index.max(1).unsigned_abs()
    }

    /// Returns the number of records to request.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of records to skip; never negative.
    #[inline]
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(u64::from(self.page_size))
    }

    /// Returns the pagination for the next page.
    #[inline]
    pub fn next_page(&self) -> Self {
        Self::new(self.page_index.max(1).saturating_add(1), self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_from_page() {
        assert_eq!(Pagination::new(3, 10).offset(), 20);
        assert_eq!(Pagination::new(1, 10).offset(), 0);
    }

    #[test]
    fn test_offset_never_negative() {
        assert_eq!(Pagination::new(0, 10).offset(), 0);
        assert_eq!(Pagination::new(-1, 10).offset(), 0);
        assert_eq!(Pagination::new(i64::MIN, 10).page(), 1);
    }

    #[test]
    fn test_next_page() {
        let pagination = Pagination::default().next_page();
        assert_eq!(pagination.page_index, 2);
        assert_eq!(pagination.offset(), 10);
    }
}
