//! Record table pagination (100 rows per page)

/// Page size constant for all pagination
pub const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    pub total_pages: usize,
    /// Index of the first row on `page`
    pub offset: usize,
}

/// Clamp `requested_page` into `[1, total_pages]` and compute its offset
///
/// ```
/// use salary_dash::pagination::calculate_pagination;
///
/// let p = calculate_pagination(250, 99);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 200);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: i64) -> Pagination {
    let total_pages = total_results.div_ceil(PAGE_SIZE);
    let last = total_pages.max(1);
    let page = usize::try_from(requested_page.max(1))
        .unwrap_or(last)
        .min(last);

    Pagination {
        page,
        total_pages,
        offset: (page - 1) * PAGE_SIZE,
    }
}
