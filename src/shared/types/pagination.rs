//! Offset/limit pagination types and arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::support::ListingError;

/// Page size, restricted to the sizes offered by the list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageSize(u64);

impl PageSize {
    pub const OPTIONS: [u64; 4] = [5, 10, 20, 50];
    pub const DEFAULT: PageSize = PageSize(10);

    pub fn new(size: u64) -> Result<Self, ListingError> {
        if Self::OPTIONS.contains(&size) {
            Ok(Self(size))
        } else {
            Err(ListingError::UnsupportedPageSize(size))
        }
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for PageSize {
    type Error = ListingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A window `(offset, limit)` over a result set of `total` rows.
///
/// `limit` is always at least 1. Values shown to the user (`page`, range)
/// are computed from the offset clamped to the last page, so a stale offset
/// left behind by a shrinking `total` still renders a consistent range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    offset: u64,
    limit: u64,
    total: u64,
}

impl PageWindow {
    pub fn new(offset: u64, limit: u64, total: u64) -> Self {
        Self {
            offset,
            limit: limit.max(1),
            total,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit).max(1)
    }

    fn display_offset(&self) -> u64 {
        let last_page_offset = (self.total_pages() - 1) * self.limit;
        self.offset.min(last_page_offset)
    }

    /// 1-based page number.
    pub fn page(&self) -> u64 {
        self.display_offset() / self.limit + 1
    }

    pub fn can_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn can_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    /// 1-based index of the first row shown, 0 for an empty result.
    pub fn range_start(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.display_offset() + 1
        }
    }

    /// 1-based index of the last row shown.
    pub fn range_end(&self) -> u64 {
        self.display_offset()
            .saturating_add(self.limit)
            .min(self.total)
    }

    pub fn prev_offset(&self) -> u64 {
        self.offset.saturating_sub(self.limit)
    }

    /// Not clamped to `total`; only meaningful when [`can_next`](Self::can_next).
    pub fn next_offset(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            page: self.page(),
            total_pages: self.total_pages(),
            can_prev: self.can_prev(),
            can_next: self.can_next(),
            range_start: self.range_start(),
            range_end: self.range_end(),
            total: self.total,
        }
    }
}

/// Derived pagination values handed to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub total_pages: u64,
    pub can_prev: bool,
    pub can_next: bool,
    pub range_start: u64,
    pub range_end: u64,
    pub total: u64,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} of {}", self.range_start, self.range_end, self.total)
    }
}

/// One committed page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub items: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64, limit: u64, offset: u64) -> Self {
        Self {
            total,
            limit,
            offset,
            items,
        }
    }
}

/// Advanced-search response as sent by the API.
///
/// Every field may be missing; the lab order endpoint names its rows `data`.
#[derive(Debug, Deserialize)]
pub struct PageResponse<T> {
    pub total: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    #[serde(alias = "data")]
    pub items: Option<Vec<T>>,
}

impl<T> PageResponse<T> {
    /// Fill missing fields: no rows, zero total, and the requested window.
    pub fn into_page(self, requested_limit: u64, requested_offset: u64) -> PageResult<T> {
        PageResult {
            total: self.total.unwrap_or(0),
            limit: self.limit.unwrap_or(requested_limit),
            offset: self.offset.unwrap_or(requested_offset),
            items: self.items.unwrap_or_default(),
        }
    }
}
