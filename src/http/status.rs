use std::collections::HashMap;
use std::fmt;

/// Numeric HTTP status code.
///
/// Any `u16` can be carried so that a handler bug (an unsupported code) is
/// caught when the response is encoded rather than silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 302 Found
    pub const FOUND: StatusCode = StatusCode(302);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use plainweb::http::status::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status code to reason phrase table used when writing the status line.
#[derive(Debug, Clone)]
pub struct StatusTable {
    reasons: HashMap<u16, String>,
}

impl Default for StatusTable {
    fn default() -> Self {
        let reasons = [
            (200, "OK"),
            (302, "Found"),
            (400, "Bad Request"),
            (404, "Not Found"),
            (405, "Method Not Allowed"),
            (500, "Internal Server Error"),
        ]
        .into_iter()
        .map(|(code, reason)| (code, reason.to_string()))
        .collect();

        Self { reasons }
    }
}

impl StatusTable {
    /// Registers an additional status code.
    pub fn with_status(mut self, code: u16, reason: impl Into<String>) -> Self {
        self.reasons.insert(code, reason.into());
        self
    }

    /// Returns the reason phrase, or `None` if the code is not in the table.
    ///
    /// ```
    /// # use plainweb::http::status::{StatusCode, StatusTable};
    /// let table = StatusTable::default();
    /// assert_eq!(table.reason(StatusCode::FOUND), Some("Found"));
    /// assert_eq!(table.reason(StatusCode::from_u16(418)), None);
    /// ```
    pub fn reason(&self, status: StatusCode) -> Option<&str> {
        self.reasons.get(&status.as_u16()).map(String::as_str)
    }
}
