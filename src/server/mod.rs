//! Accept loop and the shared state handed to every connection.

pub mod context;
pub mod listener;

pub use context::{ReadLimits, ServerContext};
