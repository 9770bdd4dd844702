//! HTTP transport for the back-office API.

pub mod client;
pub mod error;
pub mod fetcher;

pub use client::{ApiClient, ApiStatus};
pub use error::ApiError;
pub use fetcher::HttpPageFetcher;
