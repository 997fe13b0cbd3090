use std::collections::HashMap;

/// Content type used when an extension is unknown or missing.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Maps lowercase file extensions (without the dot) to content types.
///
/// The table is immutable once the server starts serving; overrides are
/// applied while building it from configuration.
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
}

impl Default for MimeTable {
    fn default() -> Self {
        let types = [
            ("html", "text/html; charset=UTF-8"),
            ("htm", "text/html; charset=UTF-8"),
            ("css", "text/css"),
            ("js", "text/javascript"),
            ("json", "application/json"),
            ("txt", "text/plain; charset=UTF-8"),
            ("png", "image/png"),
            ("jpg", "image/jpeg"),
            ("jpeg", "image/jpeg"),
            ("gif", "image/gif"),
            ("svg", "image/svg+xml"),
            ("ico", "image/x-icon"),
        ]
        .into_iter()
        .map(|(ext, ty)| (ext.to_string(), ty.to_string()))
        .collect();

        Self { types }
    }
}

impl MimeTable {
    /// Adds or replaces the content type for `ext`.
    pub fn with_override(mut self, ext: impl AsRef<str>, content_type: impl Into<String>) -> Self {
        let ext = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
        self.types.insert(ext, content_type.into());
        self
    }

    /// Looks up an extension; unknown or empty extensions resolve to
    /// `application/octet-stream`.
    pub fn lookup(&self, ext: &str) -> &str {
        self.types
            .get(&ext.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Resolves the content type for a request path by its extension.
    pub fn for_path(&self, path: &str) -> &str {
        self.lookup(extension(path))
    }
}

/// Returns the text after the last `.` of the final path segment, or `""`.
pub fn extension(path: &str) -> &str {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_takes_last_dot() {
        assert_eq!(extension("/css/site.min.css"), "css");
        assert_eq!(extension("/index.html"), "html");
        assert_eq!(extension("/now"), "");
        assert_eq!(extension("/v1.2/readme"), "");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = MimeTable::default();
        assert_eq!(table.lookup("PNG"), "image/png");
        assert_eq!(table.lookup("css"), "text/css");
    }

    #[test]
    fn unknown_extension_falls_back() {
        let table = MimeTable::default();
        assert_eq!(table.lookup("exe"), DEFAULT_CONTENT_TYPE);
        assert_eq!(table.for_path("/no-extension"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn overrides_replace_builtin_entries() {
        let table = MimeTable::default()
            .with_override(".JPG", "image/jpg")
            .with_override("wasm", "application/wasm");
        assert_eq!(table.lookup("jpg"), "image/jpg");
        assert_eq!(table.for_path("/app.wasm"), "application/wasm");
    }
}
