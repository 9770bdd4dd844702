//! Listing controller
//!
//! A [`ListingController`] owns one background worker. The worker holds the
//! [`ListingState`], the query debouncer and the in-flight fetches, and applies
//! every event (setter call, debounce expiry, fetch completion) to completion
//! before taking the next one. Views read [`ListingSnapshot`]s through a
//! `watch` channel.
//!
//! Dropping the controller aborts the worker, which drops the pending query
//! and aborts every in-flight fetch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::ports::SharedPageFetcher;
use crate::config::ListingConfig;
use crate::domain::listing::{Entity, FilterField, FilterValue};
use crate::shared::types::{PageResult, PageSize};
use crate::shared::utills::Debouncer;
use crate::support::{FetchError, ListingError, ListingResult};

use super::state::{FetchRequest, ListingEvent, ListingSnapshot, ListingState, RequestToken, Transition};

/// Tunables of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Quiet period before a typed query is sent.
    pub debounce: Duration,
    pub page_size: PageSize,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            page_size: PageSize::DEFAULT,
        }
    }
}

impl ListingOptions {
    pub fn from_config(config: &ListingConfig) -> ListingResult<Self> {
        Ok(Self {
            debounce: config.debounce(),
            page_size: config.page_size()?,
        })
    }
}

enum Command<E: Entity> {
    Event(ListingEvent<E>),
    /// Acknowledged once every earlier command has been applied.
    Flush(oneshot::Sender<()>),
}

/// Handle to a running list screen.
pub struct ListingController<E: Entity> {
    commands: mpsc::UnboundedSender<Command<E>>,
    snapshots: watch::Receiver<ListingSnapshot<E>>,
    worker: JoinHandle<()>,
}

impl<E: Entity> ListingController<E> {
    /// Spawn the worker and issue the mount fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(fetcher: SharedPageFetcher<E>, options: ListingOptions) -> Self {
        let state = ListingState::new(options.page_size);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker = ListingWorker {
            state,
            fetcher,
            commands: command_rx,
            snapshots: snapshot_tx,
            debouncer: Debouncer::new(options.debounce),
            in_flight: JoinSet::new(),
        };

        info!(
            entity = E::NAME,
            endpoint = E::ENDPOINT,
            page_size = options.page_size.get(),
            debounce_ms = options.debounce.as_millis() as u64,
            "Listing controller started"
        );

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            worker: tokio::spawn(worker.run()),
        }
    }

    fn send(&self, event: ListingEvent<E>) -> ListingResult<()> {
        self.commands
            .send(Command::Event(event))
            .map_err(|_| ListingError::Closed)
    }

    /// Update the search box. The request follows after the debounce delay.
    pub fn set_query(&self, text: impl Into<String>) -> ListingResult<()> {
        self.send(ListingEvent::SetQuery(text.into()))
    }

    /// Set (`Some`) or clear (`None`) a filter.
    pub fn set_filter(&self, field: E::Filter, value: Option<FilterValue>) -> ListingResult<()> {
        if let Some(value) = &value {
            if value.kind() != field.kind() {
                return Err(ListingError::FilterKindMismatch {
                    filter: field.as_param(),
                    expected: field.kind(),
                });
            }
        }
        self.send(ListingEvent::SetFilter(field, value))
    }

    /// Column header click.
    pub fn set_sort(&self, key: E::Sort) -> ListingResult<()> {
        self.send(ListingEvent::SetSort(key))
    }

    pub fn set_page_size(&self, size: u64) -> ListingResult<()> {
        let size = PageSize::new(size)?;
        self.send(ListingEvent::SetPageSize(size))
    }

    pub fn go_to_previous_page(&self) -> ListingResult<()> {
        self.send(ListingEvent::PreviousPage)
    }

    pub fn go_to_next_page(&self) -> ListingResult<()> {
        self.send(ListingEvent::NextPage)
    }

    /// Re-issue the current request.
    pub fn refresh(&self) -> ListingResult<()> {
        self.send(ListingEvent::Refresh)
    }

    pub fn snapshot(&self) -> ListingSnapshot<E> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot<E>> {
        self.snapshots.clone()
    }

    /// Wait until every command sent so far has been applied, no query is
    /// waiting for the debounce delay and the current fetch has resolved.
    ///
    /// Never returns while a fetch hangs; bound it with a timeout if the
    /// fetcher has none.
    pub async fn settled(&self) -> ListingResult<ListingSnapshot<E>> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::Flush(ack_tx))
            .map_err(|_| ListingError::Closed)?;
        ack_rx.await.map_err(|_| ListingError::Closed)?;

        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| snapshot.is_settled())
            .await
            .map_err(|_| ListingError::Closed)?;
        Ok(snapshot.clone())
    }
}

impl<E: Entity> Drop for ListingController<E> {
    fn drop(&mut self) {
        self.worker.abort();
        debug!(entity = E::NAME, "Listing controller dropped");
    }
}

type FetchOutcome<T> = (RequestToken, Result<PageResult<T>, FetchError>);

struct ListingWorker<E: Entity> {
    state: ListingState<E>,
    fetcher: SharedPageFetcher<E>,
    commands: mpsc::UnboundedReceiver<Command<E>>,
    snapshots: watch::Sender<ListingSnapshot<E>>,
    debouncer: Debouncer<String>,
    in_flight: JoinSet<FetchOutcome<E::Item>>,
}

impl<E: Entity> ListingWorker<E> {
    async fn run(mut self) {
        self.handle(ListingEvent::Mount);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Event(event)) => self.handle(event),
                    Some(Command::Flush(ack)) => {
                        let _ = ack.send(());
                    }
                    None => break,
                },
                query = self.debouncer.settled() => {
                    self.handle(ListingEvent::QuerySettled(query));
                }
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.complete(joined);
                }
            }
        }

        debug!(entity = E::NAME, "Listing worker stopped");
    }

    fn complete(&mut self, joined: Result<FetchOutcome<E::Item>, JoinError>) {
        match joined {
            Ok((token, Ok(page))) => self.handle(ListingEvent::FetchSucceeded { token, page }),
            Ok((token, Err(error))) => self.handle(ListingEvent::FetchFailed { token, error }),
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!(entity = E::NAME, "Fetch task panicked: {}", e),
        }
    }

    fn handle(&mut self, event: ListingEvent<E>) {
        let name = event.name();
        let transition = match self.state.apply(event) {
            Ok(transition) => transition,
            Err(e) => {
                warn!(entity = E::NAME, event = name, "Rejected listing event: {}", e);
                return;
            }
        };

        match transition {
            Transition::Unchanged => {}
            Transition::Stale(token) => {
                debug!(entity = E::NAME, token = %token, "Discarded stale response");
                metrics::counter!("listing_stale_responses_total", "entity" => E::NAME).increment(1);
            }
            Transition::Updated => self.publish(),
            Transition::Debounce(query) => {
                self.debouncer.push(query);
                self.publish();
            }
            Transition::Fetch(request) => {
                self.start(request);
                self.publish();
            }
        }
    }

    fn start(&mut self, request: FetchRequest) {
        let FetchRequest { token, params } = request;
        debug!(
            entity = E::NAME,
            token = %token,
            q = ?params.q,
            order_by = params.order_by,
            order_dir = %params.order_dir,
            limit = params.limit,
            offset = params.offset,
            "Fetching page"
        );
        metrics::counter!("listing_fetches_total", "entity" => E::NAME).increment(1);

        let fetcher = Arc::clone(&self.fetcher);
        self.in_flight.spawn(async move {
            let started = Instant::now();
            let result = fetcher.fetch_page(params).await;
            metrics::histogram!("listing_fetch_duration_seconds", "entity" => E::NAME)
                .record(started.elapsed().as_secs_f64());

            if let Err(e) = &result {
                metrics::counter!("listing_fetch_failures_total", "entity" => E::NAME).increment(1);
                warn!(entity = E::NAME, token = %token, "Fetch failed: {}", e);
            }
            (token, result)
        });
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::listing::fixtures::{rows, ScriptedFetcher, WidgetFilter, WidgetSort, Widgets};
    use crate::application::listing::Phase;
    use crate::domain::listing::SortDir;

    const LATENCY: Duration = Duration::from_millis(50);

    fn controller(fetcher: &Arc<ScriptedFetcher>) -> ListingController<Widgets> {
        ListingController::spawn(fetcher.clone(), ListingOptions::default())
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_first_page_with_defaults() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);

        let snapshot = listing.settled().await.unwrap();
        assert_eq!(fetcher.calls().len(), 1);

        let params = fetcher.last_call();
        assert_eq!(params.q, None);
        assert_eq!(params.filter("active"), Some("true"));
        assert_eq!((params.order_by, params.order_dir), ("name", SortDir::Asc));
        assert_eq!((params.limit, params.offset), (10, 0));

        assert_eq!(snapshot.phase, Phase::Success);
        assert_eq!(snapshot.items.len(), 10);
        assert_eq!(snapshot.page.to_string(), "1-10 of 25");
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_is_coalesced_into_one_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.set_query("a").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        listing.set_query("ab").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        listing.set_query("abc").unwrap();

        let snapshot = listing.settled().await.unwrap();
        let calls = fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].q.as_deref(), Some("abc"));
        assert_eq!(calls[1].offset, 0);
        assert_eq!(snapshot.effective_query, "abc");
        assert!(!snapshot.query_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn raw_query_is_visible_before_it_settles() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        let mut updates = listing.subscribe();
        listing.set_query("lu").unwrap();
        let snapshot = updates
            .wait_for(|snapshot| snapshot.query == "lu")
            .await
            .unwrap()
            .clone();
        assert!(snapshot.query_pending);
        assert_eq!(snapshot.effective_query, "");
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_superseded_query_is_ignored() {
        let fetcher = Arc::new(ScriptedFetcher::new(|params| {
            let (latency, total) = match params.q.as_deref() {
                Some("a") => (Duration::from_millis(1_000), 40),
                Some("ab") => (Duration::from_millis(10), 3),
                _ => (Duration::from_millis(10), 25),
            };
            (latency, Ok(rows(params, total)))
        }));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.set_query("a").unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(fetcher.last_call().q.as_deref(), Some("a"));

        listing.set_query("ab").unwrap();
        let snapshot = listing.settled().await.unwrap();
        assert_eq!(snapshot.total, 3);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let snapshot = listing.snapshot();
        assert_eq!(fetcher.calls().len(), 3);
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.items, vec![0, 1, 2]);
        assert_eq!(snapshot.effective_query, "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_replaced_filter_is_ignored() {
        let fetcher = Arc::new(ScriptedFetcher::new(|params| {
            let (latency, total) = match params.filter("kind") {
                Some("old") => (Duration::from_millis(1_000), 40),
                Some("new") => (Duration::from_millis(10), 3),
                _ => (Duration::from_millis(10), 25),
            };
            (latency, Ok(rows(params, total)))
        }));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.set_filter(WidgetFilter::Kind, Some("old".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fetcher.last_call().filter("kind"), Some("old"));

        listing.set_filter(WidgetFilter::Kind, Some("new".into())).unwrap();
        let snapshot = listing.settled().await.unwrap();
        assert_eq!(snapshot.total, 3);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let snapshot = listing.snapshot();
        assert_eq!(fetcher.calls().len(), 3);
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.items, vec![0, 1, 2]);
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_surfaces_message_and_clears_rows() {
        let fetcher = Arc::new(ScriptedFetcher::new(|params| {
            if params.offset == 0 {
                (LATENCY, Ok(rows(params, 25)))
            } else {
                (LATENCY, Err(FetchError::new("Network error")))
            }
        }));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.go_to_next_page().unwrap();
        let snapshot = listing.settled().await.unwrap();
        assert_eq!(snapshot.error.as_deref(), Some("Network error"));
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total, 0);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.phase, Phase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_a_filter_omits_it_from_the_request() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.set_filter(WidgetFilter::Active, None).unwrap();
        listing.settled().await.unwrap();

        let params = fetcher.last_call();
        assert_eq!(fetcher.calls().len(), 2);
        assert_eq!(params.filter("active"), None);
        assert!(params.to_query_pairs().iter().all(|(key, _)| *key != "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn paging_forward_stops_at_the_last_page() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.go_to_next_page().unwrap();
        listing.settled().await.unwrap();
        listing.go_to_next_page().unwrap();
        let snapshot = listing.settled().await.unwrap();

        assert_eq!(fetcher.last_call().offset, 20);
        assert_eq!(snapshot.page.page, 3);
        assert!(!snapshot.page.can_next);
        assert_eq!(snapshot.page.to_string(), "21-25 of 25");

        listing.go_to_next_page().unwrap();
        listing.settled().await.unwrap();
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_change_returns_to_first_page_in_one_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();
        listing.go_to_next_page().unwrap();
        listing.settled().await.unwrap();

        listing
            .set_filter(WidgetFilter::Kind, Some(FilterValue::from("armazon")))
            .unwrap();
        let snapshot = listing.settled().await.unwrap();

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].offset, 0);
        assert_eq!(calls[2].filter("kind"), Some("armazon"));
        assert_eq!(snapshot.offset, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_values_do_not_refetch() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.set_page_size(10).unwrap();
        listing
            .set_filter(WidgetFilter::Active, Some(FilterValue::Bool(true)))
            .unwrap();
        listing.go_to_previous_page().unwrap();
        listing.settled().await.unwrap();
        assert_eq!(fetcher.calls().len(), 1);

        listing.refresh().unwrap();
        listing.settled().await.unwrap();
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sort_and_page_size_reset_offset() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(60, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();
        listing.go_to_next_page().unwrap();
        listing.settled().await.unwrap();

        listing.set_sort(WidgetSort::Id).unwrap();
        listing.settled().await.unwrap();
        let params = fetcher.last_call();
        assert_eq!((params.order_by, params.order_dir, params.offset), ("id", SortDir::Asc, 0));

        listing.go_to_next_page().unwrap();
        listing.settled().await.unwrap();
        listing.set_page_size(20).unwrap();
        let snapshot = listing.settled().await.unwrap();
        assert_eq!((fetcher.last_call().limit, fetcher.last_call().offset), (20, 0));
        assert_eq!(snapshot.page.total_pages, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_input_is_rejected_synchronously() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);

        assert_eq!(
            listing.set_page_size(15),
            Err(ListingError::UnsupportedPageSize(15))
        );
        assert!(matches!(
            listing.set_filter(WidgetFilter::Active, Some(FilterValue::from("yes"))),
            Err(ListingError::FilterKindMismatch { filter: "active", .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_cancels_pending_query() {
        let fetcher = Arc::new(ScriptedFetcher::with_total(25, LATENCY));
        let listing = controller(&fetcher);
        listing.settled().await.unwrap();

        listing.set_query("abc").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(listing);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fetcher.calls().len(), 1);
    }
}
