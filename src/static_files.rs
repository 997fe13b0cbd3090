//! Serves files from the static root when no route matches.

use std::io;
use std::path::{Component, Path, PathBuf};

/// The file could not be served. Every variant is answered with 404.
#[derive(Debug, thiserror::Error)]
pub enum StaticFileNotFound {
    #[error("{path:?} escapes the static root")]
    OutsideRoot { path: String },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the file at `path` (a request path) beneath the static root.
    ///
    /// The leading `/` is stripped and the rest is joined under the root.
    /// Paths containing `..`, a root or a drive prefix are rejected before
    /// touching the filesystem, and the canonical result must still lie
    /// under the canonical root so symlinks cannot lead outside it either.
    pub async fn resolve(&self, path: &str) -> Result<Vec<u8>, StaticFileNotFound> {
        let relative = path.strip_prefix('/').unwrap_or(path);
        let outside = || StaticFileNotFound::OutsideRoot {
            path: path.to_string(),
        };
        let io_err = |source| StaticFileNotFound::Io {
            path: path.to_string(),
            source,
        };

        if !is_contained(Path::new(relative)) {
            return Err(outside());
        }

        let root = tokio::fs::canonicalize(&self.root).await.map_err(io_err)?;
        let file = tokio::fs::canonicalize(root.join(relative))
            .await
            .map_err(io_err)?;
        if !file.starts_with(&root) {
            return Err(outside());
        }

        tokio::fs::read(&file).await.map_err(io_err)
    }
}

fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
