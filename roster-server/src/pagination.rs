//! Pagination helpers for the HTTP layer
//!
//! The query engine rejects out-of-range page numbers; the HTTP layer instead
//! clamps the requested page into `[1, total_pages]` before asking for it.

/// Default page size when the request does not name one
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a request may ask for
pub const MAX_PAGE_SIZE: i64 = 500;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Offset for the conditional fetch
    pub offset: i64,
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]. `page_size` must be
/// positive; callers validate it first.
///
/// # Examples
/// ```
/// use roster_server::pagination::calculate_pagination;
///
/// // 25 total results at 10 per page = 3 pages (10 + 10 + 5)
/// let p = calculate_pagination(25, 2, 10);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 10);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(25, 99, 10);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 20);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64, page_size: i64) -> Pagination {
    let total_pages = crate::query::total_pages(total_results, page_size);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
    }
}
