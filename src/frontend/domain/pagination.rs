//! Page-size resolution and result windowing for list operations.

use super::FrontendDomainError;

/// Window of a list result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Index of the first element.
    pub offset: usize,
    /// Maximum number of elements.
    pub size: usize,
}

impl PageWindow {
    /// Creates a window.
    #[must_use]
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// Resolves a client page size against the configured bounds.
    ///
    /// Zero selects `default_size`; sizes above `max_size` are clamped. The
    /// result is never below one.
    ///
    /// # Errors
    ///
    /// Returns [`FrontendDomainError::NegativePageSize`] for negative sizes.
    pub fn resolve_size(
        page_size: i32,
        default_size: usize,
        max_size: usize,
    ) -> Result<usize, FrontendDomainError> {
        let requested = usize::try_from(page_size)
            .map_err(|_| FrontendDomainError::NegativePageSize(page_size))?;
        let size = match requested {
            0 => default_size,
            explicit => explicit,
        };
        Ok(size.min(max_size).max(1))
    }

    /// Offset at which the following page starts.
    #[must_use]
    pub const fn next_offset(&self) -> usize {
        self.offset.saturating_add(self.size)
    }

    /// Cuts `items` down to this window.
    ///
    /// Returns the page and whether elements remain beyond it. An offset past
    /// the end yields an empty page.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, bool) {
        let has_more = self.next_offset() < items.len();
        let page = items
            .into_iter()
            .skip(self.offset)
            .take(self.size)
            .collect();
        (page, has_more)
    }
}
