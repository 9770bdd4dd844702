//! In-memory page fetcher for development and testing

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::PageFetcher;
use crate::domain::listing::{Entity, FetchParams};
use crate::shared::types::PageResult;
use crate::support::FetchError;

/// Serves a fixed row set sliced by `offset`/`limit`.
///
/// Query, filters and sort are not applied; rows are returned in the order
/// they were given.
pub struct StaticPageFetcher<E: Entity> {
    rows: Vec<E::Item>,
    latency: Duration,
    requests: AtomicU64,
}

impl<E: Entity> StaticPageFetcher<E> {
    pub fn new(rows: Vec<E::Item>) -> Self {
        Self {
            rows,
            latency: Duration::ZERO,
            requests: AtomicU64::new(0),
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of pages served so far.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<E: Entity> PageFetcher<E> for StaticPageFetcher<E> {
    async fn fetch_page(&self, params: FetchParams) -> Result<PageResult<E::Item>, FetchError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let total = self.rows.len() as u64;
        let start = params.offset.min(total) as usize;
        let end = params.offset.saturating_add(params.limit).min(total) as usize;

        Ok(PageResult::new(
            self.rows[start..end].to_vec(),
            total,
            params.limit,
            params.offset,
        ))
    }
}
