use std::fmt::Display;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::http::parser::{expected_request_len, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{EncodeError, ResponseWriter};
use crate::routing::Handler;
use crate::server::context::ServerContext;

/// Failures that end a connection without a response.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("no complete request within {0:?}")]
    ReadTimeout(Duration),
    #[error("handler for {path} failed: {error:#}")]
    HandlerFailure { path: String, error: anyhow::Error },
    #[error("handler for {path} panicked: {message}")]
    HandlerPanic { path: String, message: String },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

/// Per-connection state machine.
///
/// ```text
/// Reading ─► Parsing ─► Routing ─► Handling ─► Writing ─► Closed
///               │          │          │
///               │          │          └─► Failed (handler error, no response)
///               │          └─► static fallback, 404 ─► Writing
///               └─► 400 ─► Writing
/// ```
pub enum ConnectionState {
    Reading,
    Parsing,
    Routing(Request),
    Handling(Request, Handler),
    Writing(ResponseWriter),
    Closed,
    Failed(ConnectionError),
}

/// Owns one accepted connection for a single request/response exchange.
pub struct Connection<S> {
    stream: S,
    ctx: Arc<ServerContext>,
    buffer: BytesMut,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServerContext>) -> Self {
        let capacity = ctx.limits.read_buffer_size;
        Self {
            stream,
            ctx,
            buffer: BytesMut::with_capacity(capacity),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> Result<(), ConnectionError> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => {
                    if self.read_request().await? {
                        ConnectionState::Parsing
                    } else {
                        // Client closed without sending anything
                        ConnectionState::Closed
                    }
                }

                ConnectionState::Parsing => match parse_http_request(&self.buffer) {
                    Ok(request) => ConnectionState::Routing(request),
                    Err(e) => {
                        warn!(error = %e, "Rejecting malformed request");
                        self.respond(&Response::bad_request(), None)?
                    }
                },

                ConnectionState::Routing(mut request) => {
                    match self.ctx.router.dispatch(&mut request) {
                        Ok(handler) => ConnectionState::Handling(request, handler),
                        Err(no_match) => {
                            debug!(%no_match, "Falling back to static files");
                            let response = self.serve_static(&request).await;
                            self.respond(&response, Some(&request))?
                        }
                    }
                }

                ConnectionState::Handling(request, handler) => {
                    // Handlers are synchronous and may block
                    let path = request.path.clone();
                    let outcome = tokio::task::spawn_blocking(move || {
                        let result = handler(&request);
                        (request, result)
                    })
                    .await;

                    match outcome {
                        Ok((request, Ok(response))) => self.respond(&response, Some(&request))?,
                        Ok((_, Err(error))) => {
                            ConnectionState::Failed(ConnectionError::HandlerFailure { path, error })
                        }
                        Err(join) => ConnectionState::Failed(ConnectionError::HandlerPanic {
                            path,
                            message: if join.is_panic() {
                                panic_message(join.into_panic().as_ref())
                            } else {
                                join.to_string()
                            },
                        }),
                    }
                }

                ConnectionState::Writing(writer) => {
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .map_err(ConnectionError::Write)?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => return Ok(()),

                ConnectionState::Failed(e) => return Err(e),
            };
        }
    }

    /// Reads until the request is complete, the client stops sending, or
    /// the size cap is hit.
    ///
    /// Each read is at most `read_buffer_size` bytes. Once the header block
    /// is in, reading continues only while a `Content-Length` body is
    /// still short. Returns `false` if the client sent nothing at all.
    async fn read_request(&mut self) -> Result<bool, ConnectionError> {
        let limits = self.ctx.limits;
        let mut chunk = vec![0u8; limits.read_buffer_size];

        loop {
            let n = tokio::time::timeout(limits.read_timeout, self.stream.read(&mut chunk))
                .await
                .map_err(|_| ConnectionError::ReadTimeout(limits.read_timeout))?
                .map_err(ConnectionError::Read)?;

            if n == 0 {
                break;
            }
            self.buffer.extend_from_slice(&chunk[..n]);

            if self.buffer.len() >= limits.max_request_size {
                warn!(buffered = self.buffer.len(), "Request reached size limit");
                break;
            }
            if let Some(expected) = expected_request_len(&self.buffer) {
                if self.buffer.len() >= expected {
                    break;
                }
            }
        }

        Ok(!self.buffer.is_empty())
    }

    async fn serve_static(&self, request: &Request) -> Response {
        match self.ctx.static_files.resolve(&request.path).await {
            Ok(body) => Response::ok(body),
            Err(e) => {
                debug!(error = %e, "Static file unavailable");
                Response::not_found()
            }
        }
    }

    fn respond(
        &self,
        response: &Response,
        request: Option<&Request>,
    ) -> Result<ConnectionState, ConnectionError> {
        let bytes = self.ctx.encoder.encode(response, request)?;

        info!(
            method = request.map(|r| r.method.as_str()).unwrap_or("-"),
            path = request.map(|r| r.path.as_str()).unwrap_or("-"),
            status = response.status.as_u16(),
            bytes = bytes.len(),
            "Responding"
        );

        Ok(ConnectionState::Writing(ResponseWriter::new(bytes)))
    }

    /// Shuts the stream down and releases it.
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Shutdown after response failed");
        }
    }
}

/// Runs one connection to completion and always closes it.
///
/// Failures are logged here and go no further: the accept loop and other
/// connections never see them.
pub async fn serve_connection<S>(stream: S, ctx: Arc<ServerContext>, peer: impl Display)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut conn = Connection::new(stream, ctx);

    if let Err(e) = conn.run().await {
        tracing::error!(peer = %peer, error = %e, "Connection failed, closing without response");
    }

    conn.close().await;
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
