//! Test entity and scripted fetcher shared by the listing tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::PageFetcher;
use crate::domain::listing::{filter_fields, sort_columns, Entity, FetchParams, FilterValue, SortDir};
use crate::shared::types::PageResult;
use crate::support::FetchError;

sort_columns! {
    pub enum WidgetSort {
        Name => "name",
        Id => "id",
    }
}

filter_fields! {
    pub enum WidgetFilter {
        Active => "active": Bool,
        Kind => "kind": Text,
        Since => "since": Date,
    }
}

/// Rows are their own 0-based position in the result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Widgets;

impl Entity for Widgets {
    type Item = u64;
    type Sort = WidgetSort;
    type Filter = WidgetFilter;

    const NAME: &'static str = "widgets";
    const ENDPOINT: &'static str = "/widgets/avanzado";
    const DEFAULT_SORT: WidgetSort = WidgetSort::Name;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Asc;

    fn default_filters() -> Vec<(WidgetFilter, FilterValue)> {
        vec![(WidgetFilter::Active, FilterValue::Bool(true))]
    }
}

/// `total` rows sliced by the requested window.
pub fn rows(params: &FetchParams, total: u64) -> PageResult<u64> {
    let end = (params.offset + params.limit).min(total);
    PageResult::new((params.offset..end).collect(), total, params.limit, params.offset)
}

type Script = dyn Fn(&FetchParams) -> (Duration, Result<PageResult<u64>, FetchError>) + Send + Sync;

/// Fetcher whose latency and outcome are computed from the request.
pub struct ScriptedFetcher {
    script: Box<Script>,
    calls: Mutex<Vec<FetchParams>>,
}

impl ScriptedFetcher {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&FetchParams) -> (Duration, Result<PageResult<u64>, FetchError>) + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request after `latency` from a set of `total` rows.
    pub fn with_total(total: u64, latency: Duration) -> Self {
        Self::new(move |params| (latency, Ok(rows(params, total))))
    }

    pub fn calls(&self) -> Vec<FetchParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> FetchParams {
        self.calls().last().cloned().expect("no fetch issued")
    }
}

#[async_trait]
impl PageFetcher<Widgets> for ScriptedFetcher {
    async fn fetch_page(&self, params: FetchParams) -> Result<PageResult<u64>, FetchError> {
        self.calls.lock().unwrap().push(params.clone());
        let (latency, outcome) = (self.script)(&params);
        tokio::time::sleep(latency).await;
        outcome
    }
}
