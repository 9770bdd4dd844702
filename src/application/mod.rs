pub mod listing;
pub mod ports;

// Re-export key types for convenience
pub use listing::{ListingController, ListingOptions, ListingSnapshot, Phase, RequestToken};
pub use ports::{PageFetcher, SharedPageFetcher};
