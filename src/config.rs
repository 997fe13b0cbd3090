use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::writer::DEFAULT_SERVER_NAME;

/// Config file read from the working directory when `PLAINWEB_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "plainweb.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    /// Extension to content type overrides
    pub mime: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on connections handled at once
    pub max_connections: usize,
    /// Size of each bounded read from a client
    pub read_buffer_size: usize,
    /// Reading stops once this many bytes are buffered
    pub max_request_size: usize,
    pub read_timeout_secs: u64,
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_connections: 256,
            read_buffer_size: 4096,
            max_request_size: 1024 * 1024,
            read_timeout_secs: 30,
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static"),
        }
    }
}

impl Config {
    /// Loads the YAML config file, then applies environment overrides.
    ///
    /// A missing default file is not an error; a file named explicitly by
    /// `PLAINWEB_CONFIG` must exist.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("PLAINWEB_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as null
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("STATIC_ROOT") {
            self.static_files.root = PathBuf::from(root);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.server.max_connections > 0, "server.max_connections must be positive");
        anyhow::ensure!(self.server.read_buffer_size > 0, "server.read_buffer_size must be positive");
        anyhow::ensure!(
            self.server.max_request_size >= self.server.read_buffer_size,
            "server.max_request_size must be at least server.read_buffer_size"
        );
        Ok(())
    }
}
