pub mod errors;
pub mod logging;

pub use errors::*;
pub use logging::init_tracing;
