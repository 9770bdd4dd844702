pub mod types;
pub mod utills;

pub use types::*;
pub use utills::*;
