//! Page arithmetic over a fully materialized listing

/// 1-based page number requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageNumber(usize);

impl PageNumber {
    /// The first page
    pub const FIRST: Self = Self(1);

    /// Parses a raw `page` query value
    ///
    /// Absent, zero, negative and non-numeric values all mean the first page.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map_or(Self::FIRST, Self::from_signed)
    }

    /// Clamps any integer to a valid page number
    #[must_use]
    pub fn from_signed(page: i64) -> Self {
        usize::try_from(page)
            .ok()
            .filter(|page| *page >= 1)
            .map_or(Self::FIRST, Self)
    }

    /// The page number as an integer
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// A fixed-size window into a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: PageNumber,
    page_size: usize,
}

impl Pagination {
    /// # Panics
    ///
    /// Panics if `page_size` is zero
    #[must_use]
    pub fn new(page: PageNumber, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be at least 1");
        Self { page, page_size }
    }

    /// Index of the first item on the page
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page.get() - 1).saturating_mul(self.page_size)
    }

    /// Number of pages needed for `total` items, never less than one
    #[must_use]
    pub const fn total_pages(&self, total: usize) -> usize {
        if total == 0 {
            1
        } else {
            total.div_ceil(self.page_size)
        }
    }

    /// The items `[offset, offset + page_size)` clipped to the listing
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}
