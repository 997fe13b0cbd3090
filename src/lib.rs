//! PlainWeb - a small HTTP/1.1 server built from first principles
//!
//! Raw bytes in, pattern-routed handlers, raw bytes out.

pub mod config;
pub mod http;
pub mod routing;
pub mod server;
pub mod static_files;
pub mod views;
