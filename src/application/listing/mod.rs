//! Advanced listing: one generic controller behind every list screen.

pub mod controller;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use controller::{ListingController, ListingOptions};
pub use state::{
    FetchRequest, ListingEvent, ListingSnapshot, ListingState, Phase, RequestToken, Transition,
};
