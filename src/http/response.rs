use std::collections::HashMap;

pub use crate::http::status::StatusCode;

const HTML: &str = "text/html; charset=UTF-8";

/// Response produced by a handler.
///
/// `content_type` stays `None` unless the handler sets it; the encoder then
/// infers it from the request path when the response is written.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Extra headers such as `Location`
    pub headers: HashMap<String, String>,
    /// Cookies, each written as its own `Set-Cookie` line
    pub cookies: HashMap<String, String>,
    /// Explicit content type, inferred at write time when absent
    pub content_type: Option<String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use plainweb::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::OK)
///     .content_type("application/json")
///     .cookie("theme", "dark")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.cookies["theme"], "dark");
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            cookies: HashMap::new(),
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    ///
    /// `Date`, `Host`, `Server`, `Content-Length`, `Connection` and
    /// `Content-Type` are always written by the encoder; setting them here
    /// has no effect on the wire.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds or replaces a cookie.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            cookies: self.cookies,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK with the given body; content type left to inference.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::OK).body(body).build()
    }

    /// 200 OK with an HTML body.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::OK)
            .content_type(HTML)
            .body(body)
            .build()
    }

    /// 302 Found pointing at `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::FOUND)
            .header("Location", location)
            .content_type(HTML)
            .build()
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        error_page(StatusCode::BAD_REQUEST, "400 Bad Request")
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        error_page(StatusCode::NOT_FOUND, "404 Not Found")
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        error_page(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        error_page(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
    }
}

fn error_page(status: StatusCode, title: &str) -> Response {
    ResponseBuilder::new(status)
        .content_type(HTML)
        .body(format!("<html><body><h1>{title}</h1></body></html>"))
        .build()
}
