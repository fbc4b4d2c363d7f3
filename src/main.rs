use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;

use chunked_file_storage::cli::{Cli, Commands};
use chunked_file_storage::db::{self, PgChunkStore};
use chunked_file_storage::routers::make_routes;
use chunked_file_storage::utils::config::Config;
use chunked_file_storage::{ChunkStore, FileService, MemoryChunkStore};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut cfg = Config::from_env()?;
    cli.apply(&mut cfg)?;

    if cli.command() == Commands::Migrate {
        let url = cfg
            .database_url
            .as_deref()
            .context("DATABASE_URL is required to migrate")?;
        let pool = db::init_pool(url).await.context("connect to database")?;
        db::migrate(&pool).await.context("migrate schema")?;
        return Ok(());
    }

    if let Some(addr) = cfg.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("install Prometheus exporter")?;
        info!("Metrics exporter listening on {}", addr);
    }

    let store: Arc<dyn ChunkStore> = match cfg.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url).await.context("connect to database")?;
            db::migrate(&pool).await.context("migrate schema")?;
            info!("Database OK.");
            Arc::new(PgChunkStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, chunks are kept in memory only");
            Arc::new(MemoryChunkStore::new())
        }
    };

    let service = FileService::new(store, cfg.upload_concurrency);
    let routes = make_routes(service, &cfg);

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(cfg.http_addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .with_context(|| format!("bind {}", cfg.http_addr))?;

    info!("Listening on {} (upload concurrency {})", addr, cfg.upload_concurrency);
    server.await;
    info!("Server stopped.");
    Ok(())
}
