use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::utils::config::Config;

/// Command line overrides for the environment configuration.
#[derive(Parser, Debug)]
#[command(name = "chunked-file-storage", about = "Chunked file storage server")]
pub struct Cli {
    /// Listen address, overrides HTTP_ADDR
    #[arg(short, long)]
    pub addr: Option<SocketAddr>,

    /// Postgres URL, overrides DATABASE_URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Keep chunks in memory even if DATABASE_URL is set
    #[arg(long, conflicts_with = "database_url")]
    pub memory: bool,

    /// Max chunk writes in flight per upload, overrides UPLOAD_CONCURRENCY
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Prometheus exporter address, overrides METRICS_ADDR
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create the chunk table if missing, then exit
    Migrate,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Applies the flags on top of `cfg`.
    pub fn apply(&self, cfg: &mut Config) -> Result<()> {
        if let Some(addr) = self.addr {
            cfg.http_addr = addr;
        }
        if let Some(url) = &self.database_url {
            cfg.database_url = Some(url.clone());
        }
        if self.memory {
            cfg.database_url = None;
        }
        if let Some(concurrency) = self.concurrency {
            cfg.upload_concurrency = concurrency;
        }
        if let Some(addr) = self.metrics_addr {
            cfg.metrics_addr = Some(addr);
        }
        cfg.validate()
    }
}
