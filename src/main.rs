use std::sync::Arc;

use plainweb::config::Config;
use plainweb::server::{self, ServerContext};
use plainweb::views;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::load()?;
    let router = views::routes()?;
    let ctx = Arc::new(ServerContext::from_config(&cfg, router));

    tracing::info!(
        routes = ctx.router.len(),
        static_root = %cfg.static_files.root.display(),
        "Starting server"
    );

    tokio::select! {
        res = server::listener::run(&cfg, ctx) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
