use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::PageFetcher;
use crate::domain::listing::{Entity, FetchParams};
use crate::shared::types::{PageResponse, PageResult};
use crate::support::FetchError;

use super::client::ApiClient;
use super::error::ApiError;

/// [`PageFetcher`] backed by the entity's advanced-search endpoint.
pub struct HttpPageFetcher<E: Entity> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpPageFetcher<E> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> PageFetcher<E> for HttpPageFetcher<E> {
    async fn fetch_page(&self, params: FetchParams) -> Result<PageResult<E::Item>, FetchError> {
        let response: PageResponse<E::Item> = self
            .client
            .get_json(E::ENDPOINT, &params.to_query_pairs())
            .await
            .map_err(|error| {
                if let ApiError::Status { status, .. } = &error {
                    debug!(entity = E::NAME, status = *status, "Search rejected by API");
                }
                FetchError::from(error)
            })?;
        Ok(response.into_page(params.limit, params.offset))
    }
}
