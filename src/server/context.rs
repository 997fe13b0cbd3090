use std::time::Duration;

use crate::config::Config;
use crate::http::mime::MimeTable;
use crate::http::status::StatusTable;
use crate::http::writer::ResponseEncoder;
use crate::routing::Router;
use crate::static_files::StaticFiles;

/// Bounds applied while reading a request.
#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    pub read_buffer_size: usize,
    pub max_request_size: usize,
    pub read_timeout: Duration,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            read_buffer_size: 4096,
            max_request_size: 1024 * 1024,
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// Everything a connection needs, built once before serving starts and
/// shared read-only by every connection task.
#[derive(Debug)]
pub struct ServerContext {
    pub router: Router,
    pub static_files: StaticFiles,
    pub encoder: ResponseEncoder,
    pub limits: ReadLimits,
}

impl ServerContext {
    pub fn new(router: Router, static_files: StaticFiles) -> Self {
        Self {
            router,
            static_files,
            encoder: ResponseEncoder::default(),
            limits: ReadLimits::default(),
        }
    }

    pub fn from_config(cfg: &Config, router: Router) -> Self {
        let mime = cfg
            .mime
            .iter()
            .fold(MimeTable::default(), |table, (ext, ty)| table.with_override(ext, ty.clone()));

        let encoder = ResponseEncoder::new(StatusTable::default(), mime)
            .with_server_name(cfg.server.server_name.clone());

        Self {
            router,
            static_files: StaticFiles::new(cfg.static_files.root.clone()),
            encoder,
            limits: ReadLimits {
                read_buffer_size: cfg.server.read_buffer_size,
                max_request_size: cfg.server.max_request_size,
                read_timeout: cfg.server.read_timeout(),
            },
        }
    }

    pub fn with_encoder(mut self, encoder: ResponseEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }
}
