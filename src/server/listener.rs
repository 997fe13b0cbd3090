use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::serve_connection;
use crate::server::context::ServerContext;

pub async fn run(cfg: &Config, ctx: Arc<ServerContext>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, ctx, cfg.server.max_connections).await
}

/// Accepts connections forever, one task per connection.
///
/// At most `max_connections` tasks run at once; accepting pauses while
/// all permits are taken.
pub async fn serve(
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    max_connections: usize,
) -> anyhow::Result<()> {
    let limiter = Arc::new(Semaphore::new(max_connections));

    loop {
        let permit = Arc::clone(&limiter).acquire_owned().await?;

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                tokio::time::sleep(Duration::from_millis(50)).await;
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            serve_connection(socket, ctx, peer).await;
            drop(permit);
        });
    }
}
