pub mod entities;
pub mod listing;

// Re-export commonly used types
pub use listing::{
    Entity, FetchParams, FilterField, FilterKind, FilterValue, ListQueryState, SortColumn, SortDir,
};
