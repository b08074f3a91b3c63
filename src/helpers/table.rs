use crate::error::{AppError, Result};

/// Page sizes the list views offer.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Returns the rows on `page` (zero-based). Pages past the end are empty.
pub fn slice_page<T>(data: &[T], page: usize, rows_per_page: usize) -> &[T] {
    let start = page.saturating_mul(rows_per_page).min(data.len());
    let end = start.saturating_add(rows_per_page).min(data.len());
    &data[start..end]
}

/// Table pagination state for a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub rows_per_page: usize,
}

impl Pagination {
    /// Starts on the first page.
    pub fn new(rows_per_page: usize) -> Self {
        Self { page: 0, rows_per_page }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> Result<()> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            return Err(AppError::Validation(format!(
                "Rows per page must be one of {:?}",
                ROWS_PER_PAGE_OPTIONS
            )));
        }
        self.rows_per_page = rows_per_page;
        self.page = 0;
        Ok(())
    }

    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        slice_page(data, self.page, self.rows_per_page)
    }

    /// Number of pages needed for `total` rows (at least one).
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.rows_per_page.max(1)).max(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(ROWS_PER_PAGE_OPTIONS[0])
    }
}
