//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: one request per connection, no
//! keep-alive, no chunked bodies. Every response carries
//! `Connection: close`.
//!
//! # Architecture
//!
//! - **`parser`**: Parses a raw request buffer into a [`request::Request`]
//! - **`request`**: Request representation, cookies and form decoding
//! - **`response`**: Handler-facing response value with builder pattern
//! - **`status`**: Status codes and the reason phrase table
//! - **`mime`**: Content type lookup by file extension
//! - **`writer`**: Serializes responses and writes them to the client
//! - **`connection`**: The per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Bounded reads until the request is complete
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │ ── malformed ──► 400 ─┐
//!        └──────┬──────┘                       │
//!               ▼                              │
//!        ┌─────────────┐                       │
//!        │   Routing   │ ── no match ──► static file / 404
//!        └──────┬──────┘                       │
//!               ▼                              │
//!        ┌─────────────┐                       │
//!        │  Handling   │ ── failure ──► Failed (closed, nothing written)
//!        └──────┬──────┘                       │
//!               ▼                              │
//!        ┌─────────────┐ ◄─────────────────────┘
//!        │   Writing   │
//!        └──────┬──────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use plainweb::http::connection::serve_connection;
//! use plainweb::routing::Router;
//! use plainweb::server::ServerContext;
//! use plainweb::static_files::StaticFiles;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let router = Router::builder().build()?;
//!     let ctx = Arc::new(ServerContext::new(router, StaticFiles::new("static")));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         tokio::spawn(serve_connection(socket, Arc::clone(&ctx), addr));
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod status;
pub mod writer;
