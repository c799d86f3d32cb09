//! Page-number pagination primitives for backend listings.
//!
//! Listings in the Culinaria API are addressed by a 1-based page number and a
//! page size fixed per listing kind. Callers translate the raw query value
//! into a [`PageRequest`], hand its offset and limit to storage, and wrap the
//! returned slice plus the total row count in a [`Page`] envelope.
//!
//! Raw page numbers are forgiving: a missing, zero, or negative value selects
//! the first page. Pages past the end are valid and simply carry no items.

use std::num::NonZeroU32;

use serde::Serialize;

/// Errors raised when constructing pagination primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageSizeError {
    /// A page must hold at least one item.
    #[error("page size must be greater than zero")]
    Zero,
}

/// Number of items per page. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Build a page size, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`PageSizeError::Zero`] when `size` is zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageSize;
    ///
    /// assert_eq!(PageSize::new(5).map(PageSize::get), Ok(5));
    /// assert!(PageSize::new(0).is_err());
    /// ```
    pub const fn new(size: u32) -> Result<Self, PageSizeError> {
        match NonZeroU32::new(size) {
            Some(value) => Ok(Self(value)),
            None => Err(PageSizeError::Zero),
        }
    }

    /// Build a page size from a non-zero value.
    #[must_use]
    pub const fn from_non_zero(size: NonZeroU32) -> Self {
        Self(size)
    }

    /// Number of items per page.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// A validated request for one page of a listing.
///
/// ## Invariants
/// - `number` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    number: NonZeroU32,
    size: PageSize,
}

impl PageRequest {
    /// Normalise a raw page number taken from a query string.
    ///
    /// `None`, zero and negative values select page 1. Values beyond
    /// `u32::MAX` are clamped.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageSize};
    ///
    /// let size = PageSize::new(3)?;
    /// assert_eq!(PageRequest::from_raw(None, size).number(), 1);
    /// assert_eq!(PageRequest::from_raw(Some(-4), size).number(), 1);
    /// assert_eq!(PageRequest::from_raw(Some(2), size).number(), 2);
    /// # Ok::<(), pagination::PageSizeError>(())
    /// ```
    #[must_use]
    pub fn from_raw(raw: Option<i64>, size: PageSize) -> Self {
        let number = raw
            .filter(|value| *value > 0)
            .map_or(NonZeroU32::MIN, |value| {
                u32::try_from(value)
                    .ok()
                    .and_then(NonZeroU32::new)
                    .unwrap_or(NonZeroU32::MAX)
            });
        Self { number, size }
    }

    /// Request the first page.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self {
            number: NonZeroU32::MIN,
            size,
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number.get()
    }

    /// Page size in force for this request.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number.get() - 1).saturating_mul(u64::from(self.size.get()))
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size.get())
    }
}

/// One page of a listing together with the totals needed to navigate it.
///
/// Serialises as
/// `{items, page, pageSize, totalItems, totalPages, hasPrevious, hasNext}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u64,
    has_previous: bool,
    has_next: bool,
}

impl<T> Page<T> {
    /// Wrap a page of items fetched for `request` from a listing holding
    /// `total_items` rows in total.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest, PageSize};
    ///
    /// let request = PageRequest::from_raw(Some(1), PageSize::new(3)?);
    /// let page = Page::new(request, vec!["a", "b", "c"], 7);
    /// assert_eq!(page.total_pages(), 3);
    /// assert!(page.has_next());
    /// # Ok::<(), pagination::PageSizeError>(())
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, items: Vec<T>, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit());
        let page = request.number();
        Self {
            items,
            page,
            page_size: request.size().get(),
            total_items,
            total_pages,
            has_previous: page > 1,
            has_next: u64::from(page) < total_pages,
        }
    }

    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size the listing was cut with.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows in the whole listing.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Pages in the whole listing; zero when the listing is empty.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Transform every item while keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// Cut one page out of an already ordered, fully materialised listing.
///
/// Storage adapters that cannot push offsets down to a query engine use this
/// to produce the same envelope a database-backed adapter would.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, PageSize, paginate};
///
/// let rows = [9, 8, 7, 6, 5];
/// let page = paginate(&rows, PageRequest::from_raw(Some(2), PageSize::new(2)?));
/// assert_eq!(page.items(), &[7, 6]);
/// # Ok::<(), pagination::PageSizeError>(())
/// ```
#[must_use]
pub fn paginate<T: Clone>(rows: &[T], request: PageRequest) -> Page<T> {
    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let items = rows.iter().skip(skip).take(take).cloned().collect();
    let total = u64::try_from(rows.len()).unwrap_or(u64::MAX);
    Page::new(request, items, total)
}
