//! Page-number pagination primitives shared by Registro FSE listings.
//!
//! Listings are fetched in full from the remote API and sliced locally.
//! [`PageRequest`] validates the requested page and page size, and
//! [`Page`] carries one slice together with the navigation metadata a
//! front end needs to render "previous", "next", and numbered page links.

use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of rows shown per page when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A validated request for one page of a listing.
///
/// ## Invariants
/// - `page` is one-based and non-zero.
/// - `per_page` is non-zero.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 10).expect("valid request");
/// assert_eq!(request.page(), 2);
/// assert_eq!(request.offset(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    page: NonZeroUsize,
    per_page: NonZeroUsize,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when either value is zero.
    pub fn new(page: usize, per_page: usize) -> Result<Self, PageRequestError> {
        let page = NonZeroUsize::new(page).ok_or(PageRequestError::ZeroPage)?;
        let per_page = NonZeroUsize::new(per_page).ok_or(PageRequestError::ZeroPageSize)?;
        Ok(Self { page, per_page })
    }

    /// First page with [`DEFAULT_PAGE_SIZE`] rows.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: NonZeroUsize::MIN,
            per_page: match NonZeroUsize::new(DEFAULT_PAGE_SIZE) {
                Some(value) => value,
                None => NonZeroUsize::MIN,
            },
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page.get()
    }

    /// Rows per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page.get()
    }

    /// Index of the first row on this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page.get() - 1).saturating_mul(self.per_page.get())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRequestDto {
    page: usize,
    per_page: usize,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page(),
            per_page: value.per_page(),
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::new(value.page, value.per_page)
    }
}

/// One page of a locally paginated listing.
///
/// A page past the end of the listing is not an error: it simply holds no
/// items, which happens after rows are deleted from the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    page: usize,
    per_page: usize,
    total_items: usize,
    total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `rows` according to `request`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let rows: Vec<u32> = (1..=25).collect();
    /// let page = Page::paginate(rows, PageRequest::new(3, 10).expect("valid"));
    /// assert_eq!(page.items(), &[21, 22, 23, 24, 25]);
    /// assert_eq!(page.total_pages(), 3);
    /// assert!(!page.has_next());
    /// ```
    pub fn paginate(rows: Vec<T>, request: PageRequest) -> Self {
        let total_items = rows.len();
        let total_pages = total_items.div_ceil(request.per_page());
        let items = rows
            .into_iter()
            .skip(request.offset())
            .take(request.per_page())
            .collect();
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total_items,
            total_pages,
        }
    }

    /// Rows on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Rows in the whole listing.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Pages in the whole listing; zero for an empty listing.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Whether a "previous" link should be enabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a "next" link should be enabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page numbers to render as links.
    #[must_use]
    pub const fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page slicing and navigation flags.

    use super::*;
    use rstest::rstest;

    fn rows(count: u32) -> Vec<u32> {
        (1..=count).collect()
    }

    #[rstest]
    #[case(0, 1, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::ZeroPageSize)]
    fn rejects_zero_values(
        #[case] page: usize,
        #[case] per_page: usize,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, per_page), Err(expected));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(20, 2)]
    #[case(21, 3)]
    fn total_pages_rounds_up(#[case] len: u32, #[case] expected: usize) {
        let page = Page::paginate(rows(len), PageRequest::first());
        assert_eq!(page.total_pages(), expected);
        assert_eq!(page.page_numbers().count(), expected);
    }

    #[test]
    fn middle_page_enables_both_links() {
        let page = Page::paginate(rows(30), PageRequest::new(2, 10).expect("valid"));
        assert_eq!(page.items().first(), Some(&11));
        assert_eq!(page.items().len(), 10);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::paginate(rows(5), PageRequest::new(4, 10).expect("valid"));
        assert!(page.items().is_empty());
        assert_eq!(page.total_items(), 5);
        assert!(!page.has_next());
    }

    #[test]
    fn request_deserialises_through_validation() {
        let ok: PageRequest =
            serde_json::from_str(r#"{"page":3,"perPage":5}"#).expect("valid payload");
        assert_eq!(ok.offset(), 10);

        let err = serde_json::from_str::<PageRequest>(r#"{"page":0,"perPage":5}"#);
        assert!(err.is_err(), "zero page must be rejected");
    }
}
