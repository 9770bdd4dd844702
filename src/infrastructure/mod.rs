//! Infrastructure layer - external concerns

pub mod http;
pub mod memory;

pub use http::{ApiClient, ApiError, ApiStatus, HttpPageFetcher};
pub use memory::StaticPageFetcher;
