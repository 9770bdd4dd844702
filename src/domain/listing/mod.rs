//! Listing domain: entity schema, query state and request parameters.

pub mod params;
pub mod query;
pub mod schema;

pub use params::FetchParams;
pub use query::ListQueryState;
pub use schema::{Entity, FilterField, FilterKind, FilterValue, SortColumn, SortDir};
pub(crate) use schema::{filter_fields, sort_columns};
