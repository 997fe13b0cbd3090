use bytes::{BufMut, BytesMut};
use time::OffsetDateTime;
use time::macros::format_description;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::mime::MimeTable;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::status::{StatusCode, StatusTable};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Identifier written in the `Host` and `Server` headers by default.
pub const DEFAULT_SERVER_NAME: &str = "PlainWeb/0.1";

/// Headers the encoder always writes itself.
const RESERVED_HEADERS: [&str; 6] = [
    "Date",
    "Host",
    "Server",
    "Content-Length",
    "Connection",
    "Content-Type",
];

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("status code {0} is not in the status table")]
    UnknownStatusCode(StatusCode),
    #[error("header {name} contains a line break")]
    LineBreakInHeader { name: String },
    #[error("failed to format Date header: {0}")]
    Date(#[from] time::error::Format),
}

/// Serializes a [`Response`] into wire-format bytes.
///
/// Owns the status and MIME tables; both are fixed once the encoder is
/// built.
#[derive(Debug, Clone)]
pub struct ResponseEncoder {
    statuses: StatusTable,
    mime: MimeTable,
    server_name: String,
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self::new(StatusTable::default(), MimeTable::default())
    }
}

impl ResponseEncoder {
    pub fn new(statuses: StatusTable, mime: MimeTable) -> Self {
        Self {
            statuses,
            mime,
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }

    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn mime(&self) -> &MimeTable {
        &self.mime
    }

    /// Content type written for `response`: the explicit one, or the type
    /// inferred from the request path's extension.
    pub fn content_type<'a>(&'a self, response: &'a Response, request: Option<&Request>) -> &'a str {
        match &response.content_type {
            Some(ct) => ct,
            None => self.mime.for_path(request.map(|r| r.path.as_str()).unwrap_or("")),
        }
    }

    /// Encodes using the current UTC time for the `Date` header.
    pub fn encode(&self, response: &Response, request: Option<&Request>) -> Result<Vec<u8>, EncodeError> {
        self.encode_at(response, request, OffsetDateTime::now_utc())
    }

    pub fn encode_at(
        &self,
        response: &Response,
        request: Option<&Request>,
        now: OffsetDateTime,
    ) -> Result<Vec<u8>, EncodeError> {
        let reason = self
            .statuses
            .reason(response.status)
            .ok_or(EncodeError::UnknownStatusCode(response.status))?;

        let date = now.to_offset(time::UtcOffset::UTC).format(format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        ))?;

        let mut buf = BytesMut::with_capacity(256 + response.body.len());

        // Status line
        put_line(&mut buf, &format!("{} {} {}", HTTP_VERSION, response.status, reason));

        // Standard headers
        put_header(&mut buf, "Date", &date);
        put_header(&mut buf, "Host", &self.server_name);
        put_header(&mut buf, "Server", &self.server_name);
        put_header(&mut buf, "Content-Length", &response.body.len().to_string());
        put_header(&mut buf, "Connection", "close");
        let content_type = self.content_type(response, request);
        check_line("Content-Type", content_type)?;
        put_header(&mut buf, "Content-Type", content_type);

        // Caller headers, sorted so the output is stable
        let mut extra: Vec<_> = response
            .headers
            .iter()
            .filter(|(k, _)| !is_reserved(k))
            .collect();
        extra.sort();
        for (k, v) in extra {
            check_line(k, k)?;
            check_line(k, v)?;
            put_header(&mut buf, k, v);
        }

        let mut cookies: Vec<_> = response.cookies.iter().collect();
        cookies.sort();
        for (name, value) in cookies {
            let cookie = format!("{name}={value}");
            check_line("Set-Cookie", &cookie)?;
            put_header(&mut buf, "Set-Cookie", &cookie);
        }

        // Header/body separator
        buf.put_slice(b"\r\n");

        // Body
        buf.put_slice(&response.body);

        Ok(buf.to_vec())
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_HEADERS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn check_line(name: &str, text: &str) -> Result<(), EncodeError> {
    if text.contains(['\r', '\n']) {
        return Err(EncodeError::LineBreakInHeader {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn put_line(buf: &mut BytesMut, line: &str) {
    buf.put_slice(line.as_bytes());
    buf.put_slice(b"\r\n");
}

fn put_header(buf: &mut BytesMut, key: &str, value: &str) {
    buf.put_slice(key.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(b"\r\n");
}

/// Writes an encoded response to the client in a single send.
pub struct ResponseWriter {
    buffer: Vec<u8>,
}

impl ResponseWriter {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }

    pub async fn write_to_stream<S>(&self, stream: &mut S) -> std::io::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        stream.write_all(&self.buffer).await?;
        stream.flush().await
    }
}
