//! Cursor pagination for the proposal list.
//!
//! Proposals are ordered by their opening sequence and leave the list when
//! admitted, so the cursor is the last sequence a client has seen rather than
//! an offset. Pages stay stable while other proposals close.

use serde::{Deserialize, Serialize};

/// Default page size when `count` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Return only items whose sequence is greater than this.
    pub after: Option<u64>,
    /// Number of items per page (default 100, max 1000).
    pub count: Option<u32>,
}

impl PaginationParams {
    /// Resolve effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_count(&self) -> u32 {
        self.count
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Select one page from `items`, which must be sorted by `sequence_of`.
    pub fn page<T>(
        &self,
        items: Vec<T>,
        sequence_of: impl Fn(&T) -> u64,
    ) -> (Vec<T>, PaginationMeta) {
        let count = self.effective_count() as usize;
        let mut rest = items
            .into_iter()
            .filter(|item| self.after.map_or(true, |after| sequence_of(item) > after))
            .peekable();
        let page: Vec<T> = rest.by_ref().take(count).collect();
        let cursor = match rest.peek() {
            Some(_) => page.last().map(&sequence_of),
            None => None,
        };
        (page, PaginationMeta { cursor })
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Pass as `after` to fetch the next page; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(after: Option<u64>, count: Option<u32>) -> PaginationParams {
        PaginationParams { after, count }
    }

    #[test]
    fn effective_count_defaults() {
        assert_eq!(PaginationParams::default().effective_count(), 100);
    }

    #[test]
    fn effective_count_clamps() {
        assert_eq!(params(None, Some(5000)).effective_count(), 1000);
        assert_eq!(params(None, Some(0)).effective_count(), 1);
    }

    #[test]
    fn full_page_returns_cursor_of_last_item() {
        let (page, meta) = params(None, Some(2)).page(vec![3u64, 5, 9], |s| *s);
        assert_eq!(page, vec![3, 5]);
        assert_eq!(meta.cursor, Some(5));
    }

    #[test]
    fn cursor_skips_seen_items_and_ends() {
        let (page, meta) = params(Some(5), Some(2)).page(vec![3u64, 5, 9], |s| *s);
        assert_eq!(page, vec![9]);
        assert_eq!(meta.cursor, None);
    }

    #[test]
    fn exact_fit_has_no_next_cursor() {
        let (page, meta) = params(None, Some(3)).page(vec![1u64, 2, 3], |s| *s);
        assert_eq!(page.len(), 3);
        assert!(meta.cursor.is_none());
    }
}
