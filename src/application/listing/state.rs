//! Listing state machine
//!
//! [`ListingState::apply`] is the single transition function of a list
//! screen. It is synchronous and side-effect free: the worker performs the
//! effect named by the returned [`Transition`] (publish a snapshot, arm the
//! debouncer, start a fetch).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::listing::{Entity, FetchParams, FilterValue, ListQueryState, SortDir};
use crate::shared::types::{PageInfo, PageResult, PageSize};
use crate::support::{FetchError, ListingResult};

/// Identifies one fetch cycle. Only the most recently minted token may
/// commit its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fetch lifecycle of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Before the mount fetch.
    Idle,
    Loading,
    Success,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything that can happen to a list screen.
#[derive(Debug)]
pub enum ListingEvent<E: Entity> {
    Mount,
    SetQuery(String),
    QuerySettled(String),
    SetFilter(E::Filter, Option<FilterValue>),
    SetSort(E::Sort),
    SetPageSize(PageSize),
    PreviousPage,
    NextPage,
    Refresh,
    FetchSucceeded {
        token: RequestToken,
        page: PageResult<E::Item>,
    },
    FetchFailed {
        token: RequestToken,
        error: FetchError,
    },
}

impl<E: Entity> ListingEvent<E> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::SetQuery(_) => "set_query",
            Self::QuerySettled(_) => "query_settled",
            Self::SetFilter(..) => "set_filter",
            Self::SetSort(_) => "set_sort",
            Self::SetPageSize(_) => "set_page_size",
            Self::PreviousPage => "previous_page",
            Self::NextPage => "next_page",
            Self::Refresh => "refresh",
            Self::FetchSucceeded { .. } => "fetch_succeeded",
            Self::FetchFailed { .. } => "fetch_failed",
        }
    }
}

/// A fetch the worker must start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub params: FetchParams,
}

/// Effect requested by one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Unchanged,
    /// A response for a superseded token was dropped; nothing changed.
    Stale(RequestToken),
    /// Visible state changed; publish.
    Updated,
    /// Raw query changed; publish and (re)arm the debouncer with this value.
    Debounce(String),
    /// Parameters changed; publish and start this fetch.
    Fetch(FetchRequest),
}

/// Immutable view of a list screen handed to subscribers.
#[derive(Debug, Clone)]
pub struct ListingSnapshot<E: Entity> {
    pub items: Vec<E::Item>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
    pub query: String,
    pub effective_query: String,
    pub filters: BTreeMap<E::Filter, FilterValue>,
    pub sort_key: E::Sort,
    pub sort_dir: SortDir,
    pub page_size: PageSize,
    pub offset: u64,
    /// A typed query is waiting for the debounce delay.
    pub query_pending: bool,
    pub page: PageInfo,
}

impl<E: Entity> ListingSnapshot<E> {
    /// Mounted, nothing loading and no query waiting to settle.
    pub fn is_settled(&self) -> bool {
        self.phase != Phase::Idle && !self.loading && !self.query_pending
    }
}

#[derive(Debug, Clone)]
pub struct ListingState<E: Entity> {
    query: ListQueryState<E>,
    items: Vec<E::Item>,
    total: u64,
    loading: bool,
    error: Option<String>,
    phase: Phase,
    query_pending: bool,
    current: Option<RequestToken>,
    issued: u64,
}

impl<E: Entity> ListingState<E> {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            query: ListQueryState::new(page_size),
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            phase: Phase::Idle,
            query_pending: false,
            current: None,
            issued: 0,
        }
    }

    pub fn query(&self) -> &ListQueryState<E> {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn apply(&mut self, event: ListingEvent<E>) -> ListingResult<Transition> {
        let transition = match event {
            ListingEvent::Mount => {
                if self.phase == Phase::Idle {
                    self.start_fetch()
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::SetQuery(text) => {
                if self.query.set_query(text.clone()) {
                    self.query_pending = true;
                    Transition::Debounce(text)
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::QuerySettled(text) => {
                let was_pending = std::mem::replace(&mut self.query_pending, false);
                if self.query.settle_query(text) {
                    self.start_fetch()
                } else if was_pending {
                    Transition::Updated
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::SetFilter(field, value) => {
                if self.query.set_filter(field, value)? {
                    self.start_fetch()
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::SetSort(key) => {
                self.query.select_sort(key);
                self.start_fetch()
            }
            ListingEvent::SetPageSize(size) => {
                if self.query.set_page_size(size) {
                    self.start_fetch()
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::PreviousPage => {
                let window = self.query.window(self.total);
                if window.can_prev() && self.query.set_offset(window.prev_offset()) {
                    self.start_fetch()
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::NextPage => {
                let window = self.query.window(self.total);
                if window.can_next() && self.query.set_offset(window.next_offset()) {
                    self.start_fetch()
                } else {
                    Transition::Unchanged
                }
            }
            ListingEvent::Refresh => self.start_fetch(),
            ListingEvent::FetchSucceeded { token, page } => {
                if self.current != Some(token) {
                    return Ok(Transition::Stale(token));
                }
                self.items = page.items;
                self.total = page.total;
                self.loading = false;
                self.error = None;
                self.phase = Phase::Success;
                Transition::Updated
            }
            ListingEvent::FetchFailed { token, error } => {
                if self.current != Some(token) {
                    return Ok(Transition::Stale(token));
                }
                self.items.clear();
                self.total = 0;
                self.loading = false;
                self.error = Some(error.message);
                self.phase = Phase::Failed;
                Transition::Updated
            }
        };

        Ok(transition)
    }

    fn start_fetch(&mut self) -> Transition {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        self.loading = true;
        self.error = None;
        self.phase = Phase::Loading;

        Transition::Fetch(FetchRequest {
            token,
            params: self.query.to_params(),
        })
    }

    pub fn snapshot(&self) -> ListingSnapshot<E> {
        ListingSnapshot {
            items: self.items.clone(),
            total: self.total,
            loading: self.loading,
            error: self.error.clone(),
            phase: self.phase,
            query: self.query.query().to_string(),
            effective_query: self.query.effective_query().to_string(),
            filters: self.query.filters().clone(),
            sort_key: self.query.sort_key(),
            sort_dir: self.query.sort_dir(),
            page_size: self.query.page_size(),
            offset: self.query.offset(),
            query_pending: self.query_pending,
            page: self.query.window(self.total).info(),
        }
    }
}
