//! Page-number pagination primitives shared by backend list endpoints.
//!
//! A [`PageRequest`] carries a validated one-based page number and a page
//! size. Adapters translate it into `OFFSET`/`LIMIT` via
//! [`PageRequest::offset`] and [`PageRequest::limit`], count the rows that
//! match the same predicate, and wrap the slice in a [`Page`] whose
//! [`PageInfo`] reports navigation hints to clients.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(3, 10)?;
//! assert_eq!(request.offset(), 20);
//!
//! let page = Page::new(vec!["a", "b", "c", "d", "e"], request, 25);
//! assert_eq!(page.pagination.total_pages, 3);
//! assert!(!page.pagination.has_next_page);
//! assert!(page.pagination.has_prev_page);
//! # Ok::<(), pagination::PageRequestError>(())
//! ```

use serde::{Deserialize, Serialize};

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size accepted from callers.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are one-based.
    #[error("page must be at least 1")]
    PageTooSmall,
    /// Empty pages cannot be requested.
    #[error("limit must be at least 1")]
    LimitTooSmall,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// Largest accepted page size.
        max: u32,
    },
}

/// Validated page selection.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page request, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageTooSmall);
        }
        if limit == 0 {
            return Err(PageRequestError::LimitTooSmall);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// Build a page request from optional query values, applying
    /// [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`] for absent values.
    ///
    /// # Errors
    ///
    /// Propagates the same failures as [`PageRequest::new`].
    pub fn from_optional(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            limit.unwrap_or(DEFAULT_LIMIT),
        )
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of matching rows to skip before the page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Navigation metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page number that was served.
    pub current_page: u32,
    /// Number of pages needed to hold every matching item.
    pub total_pages: u64,
    /// Count of matching items before pagination.
    pub total_items: u64,
    /// Page size that was applied.
    pub items_per_page: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PageInfo {
    /// Derive navigation metadata from the request and the total match count.
    #[must_use]
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.limit));
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.limit,
            has_next_page: u64::from(request.page) < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

/// A slice of results plus its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in result order.
    pub items: Vec<T>,
    /// Navigation metadata.
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Wrap a result slice with metadata computed from `total_items`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            pagination: PageInfo::new(request, total_items),
        }
    }

    /// Convert every item while keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
