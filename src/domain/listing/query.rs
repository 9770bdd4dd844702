//! Query state of one list screen.
//!
//! Every mutator reports whether it changed anything that belongs in the
//! request. The offset-reset rule lives here: a change of effective query,
//! filter, sort or page size moves back to the first page in the same call,
//! so the caller never observes (or fetches) the intermediate state.

use std::collections::BTreeMap;

use crate::shared::types::{PageSize, PageWindow};
use crate::support::{ListingError, ListingResult};

use super::params::FetchParams;
use super::schema::{Entity, FilterField, FilterValue, SortColumn, SortDir};

#[derive(Debug, Clone)]
pub struct ListQueryState<E: Entity> {
    query: String,
    effective_query: String,
    filters: BTreeMap<E::Filter, FilterValue>,
    sort_key: E::Sort,
    sort_dir: SortDir,
    page_size: PageSize,
    offset: u64,
}

impl<E: Entity> ListQueryState<E> {
    /// Fresh state with the entity's default sort and default filters.
    pub fn new(page_size: PageSize) -> Self {
        let filters = E::default_filters()
            .into_iter()
            .filter(|(field, value)| value.kind() == field.kind() && !value.is_blank())
            .collect();

        Self {
            query: String::new(),
            effective_query: String::new(),
            filters,
            sort_key: E::DEFAULT_SORT,
            sort_dir: E::DEFAULT_SORT_DIR,
            page_size,
            offset: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn effective_query(&self) -> &str {
        &self.effective_query
    }

    pub fn filters(&self) -> &BTreeMap<E::Filter, FilterValue> {
        &self.filters
    }

    pub fn filter(&self, field: E::Filter) -> Option<&FilterValue> {
        self.filters.get(&field)
    }

    pub fn sort_key(&self) -> E::Sort {
        self.sort_key
    }

    pub fn sort_dir(&self) -> SortDir {
        self.sort_dir
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Raw search-box text. Does not affect the request until settled.
    pub fn set_query(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.query == text {
            return false;
        }
        self.query = text;
        true
    }

    /// Adopt a debounced query value.
    pub fn settle_query(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.effective_query == text {
            return false;
        }
        self.effective_query = text;
        self.offset = 0;
        true
    }

    /// Set or clear a filter. Blank text clears it.
    pub fn set_filter(&mut self, field: E::Filter, value: Option<FilterValue>) -> ListingResult<bool> {
        if let Some(value) = &value {
            if value.kind() != field.kind() {
                return Err(ListingError::FilterKindMismatch {
                    filter: field.as_param(),
                    expected: field.kind(),
                });
            }
        }

        let value = value.filter(|value| !value.is_blank());
        if self.filters.get(&field) == value.as_ref() {
            return Ok(false);
        }

        match value {
            Some(value) => self.filters.insert(field, value),
            None => self.filters.remove(&field),
        };
        self.offset = 0;
        Ok(true)
    }

    /// Header click: a new column sorts ascending, the current one flips.
    pub fn select_sort(&mut self, key: E::Sort) -> bool {
        if self.sort_key == key {
            self.sort_dir = self.sort_dir.toggled();
        } else {
            self.sort_key = key;
            self.sort_dir = SortDir::Asc;
        }
        self.offset = 0;
        true
    }

    pub fn set_page_size(&mut self, page_size: PageSize) -> bool {
        if self.page_size == page_size {
            return false;
        }
        self.page_size = page_size;
        self.offset = 0;
        true
    }

    pub fn set_offset(&mut self, offset: u64) -> bool {
        if self.offset == offset {
            return false;
        }
        self.offset = offset;
        true
    }

    pub fn window(&self, total: u64) -> PageWindow {
        PageWindow::new(self.offset, self.page_size.get(), total)
    }

    pub fn to_params(&self) -> FetchParams {
        let q = self.effective_query.trim();
        FetchParams {
            q: (!q.is_empty()).then(|| q.to_string()),
            filters: self
                .filters
                .iter()
                .filter_map(|(field, value)| value.to_param().map(|param| (field.as_param(), param)))
                .collect(),
            order_by: self.sort_key.as_param(),
            order_dir: self.sort_dir,
            limit: self.page_size.get(),
            offset: self.offset,
        }
    }
}
