use thiserror::Error;

use crate::domain::listing::FilterKind;

/// Failure of a single fetch cycle.
///
/// The message is shown to the user verbatim, so it carries whatever the
/// transport reported (server `detail`, body text or connection error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for FetchError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for FetchError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors returned by the listing controller API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("Unsupported page size {0} (expected one of 5, 10, 20, 50)")]
    UnsupportedPageSize(u64),

    #[error("Filter '{filter}' expects a {expected} value")]
    FilterKindMismatch {
        filter: &'static str,
        expected: FilterKind,
    },

    #[error("Invalid {expected} value for filter '{filter}': {value}")]
    InvalidFilterValue {
        filter: &'static str,
        expected: FilterKind,
        value: String,
    },

    #[error("Unknown sort column: {0}")]
    UnknownColumn(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Listing controller is no longer running")]
    Closed,
}

pub type ListingResult<T> = Result<T, ListingError>;
