//! # Optica Console
//!
//! Back-office console for an optical shop: customers, suppliers, supplies,
//! supply purchases, lab orders and prescriptions, each browsed through a
//! filtered, sorted, paginated advanced-search listing.
//!
//! ## Architecture
//!
//! - **domain**: entity schemas (row types, sort columns, filter fields) and
//!   the query state of a list screen
//! - **application**: the listing controller (state machine + async worker)
//!   and the `PageFetcher` port
//! - **infrastructure**: HTTP transport for the REST API and an in-memory
//!   fetcher
//! - **shared**: pagination arithmetic and the query debouncer
//! - **support**: error types and tracing bootstrap

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod support;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export the listing surface
pub use application::{ListingController, ListingOptions, ListingSnapshot, PageFetcher, Phase};
pub use domain::{Entity, FilterValue, SortDir};
pub use shared::types::{PageInfo, PageResult, PageSize};
pub use support::{FetchError, ListingError};

// Re-export transports
pub use infrastructure::{ApiClient, ApiError, HttpPageFetcher, StaticPageFetcher};
