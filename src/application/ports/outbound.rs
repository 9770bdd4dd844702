//! Outbound ports — interfaces for loading list pages from the back office
//!
//! [`PageFetcher`] decouples the listing controller from the transport.
//! Production code uses
//! [`HttpPageFetcher`](crate::infrastructure::http::HttpPageFetcher); tests
//! and demos use
//! [`StaticPageFetcher`](crate::infrastructure::memory::StaticPageFetcher)
//! or their own scripted implementations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::listing::{Entity, FetchParams};
use crate::shared::types::PageResult;
use crate::support::FetchError;

// ── PageFetcher ────────────────────────────────────────────────

/// Port for one advanced-search round-trip.
///
/// Implementations must not retry on their own; a failure is reported to
/// the user and the next change of parameters issues a new request.
#[async_trait]
pub trait PageFetcher<E: Entity>: Send + Sync {
    async fn fetch_page(&self, params: FetchParams) -> Result<PageResult<E::Item>, FetchError>;
}

/// Shared fetcher handle.
pub type SharedPageFetcher<E> = Arc<dyn PageFetcher<E>>;
