//! Pagination of the joined catalog (100 courses/page)

/// Page size for catalog listings
pub const PAGE_SIZE: usize = 100;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Index of the first item on the page
    pub offset: usize,
}

impl Pagination {
    /// The items of `all` that fall on this page
    pub fn slice<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let start = self.offset.min(all.len());
        let end = (start + PAGE_SIZE).min(all.len());
        &all[start..end]
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// The page is clamped to `[1, total_pages]`.
///
/// # Examples
/// ```
/// use companion_catalog::pagination::calculate_pagination;
///
/// // 250 courses = 3 pages (100 + 100 + 50)
/// let p = calculate_pagination(250, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 100);
///
/// let p = calculate_pagination(250, 99);
/// assert_eq!(p.page, 3);  // Clamped to last page
/// assert_eq!(p.offset, 200);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize) -> Pagination {
    let total_pages = total_results.div_ceil(PAGE_SIZE);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(250, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 100);
    }

    #[test]
    fn test_pagination_out_of_bounds() {
        let high = calculate_pagination(150, 99);
        assert_eq!(high.page, 2);
        assert_eq!(high.offset, 100);

        let low = calculate_pagination(150, 0);
        assert_eq!(low.page, 1);
        assert_eq!(low.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 3);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert!(p.slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_slice_last_page() {
        let items: Vec<usize> = (0..250).collect();
        let p = calculate_pagination(items.len(), 3);
        let page = p.slice(&items);
        assert_eq!(page.len(), 50);
        assert_eq!(page.first(), Some(&200));
    }

    #[test]
    fn test_slice_exact_boundary() {
        let items: Vec<usize> = (0..200).collect();
        let p = calculate_pagination(items.len(), 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.slice(&items).len(), 100);
    }
}
