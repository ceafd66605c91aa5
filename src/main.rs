use anyhow::Context;
use clap::Parser;
use respkv::aof::SyncPolicy;
use respkv::config::{Config, PersistenceKind};
use respkv::{persistence, Server};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Minimal RESP key-value server
#[derive(Debug, Parser)]
#[command(name = "respkv", version, about)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    listen: Option<String>,

    /// Persistence strategy
    #[arg(short, long, value_enum)]
    strategy: Option<PersistenceKind>,

    /// Path of the append-only file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// When the append-only file is synced to disk
    #[arg(long, value_enum)]
    sync: Option<SyncPolicy>,

    /// Background sync interval for the periodic policy
    #[arg(long)]
    sync_interval_ms: Option<u64>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(listen) = self.listen {
            config.listen_addr = listen;
        }
        if let Some(strategy) = self.strategy {
            config.persistence = strategy;
        }
        if let Some(file) = self.file {
            config.aof.path = file;
        }
        if let Some(sync) = self.sync {
            config.aof.sync_policy = sync;
        }
        if let Some(interval) = self.sync_interval_ms {
            config.aof.sync_interval_ms = interval;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config()?;
    info!("respkv starting with {:?}", config);

    let persistence = persistence::open(&config).context("failed to open persistence")?;
    let server = Server::new(persistence)
        .context("failed to restore state")?
        .with_max_frame_bytes(config.max_frame_bytes);

    tokio::select! {
        result = server.run(&config.listen_addr) => {
            if let Err(e) = &result {
                error!("RESP server error: {:#}", e);
            }
            server.shutdown()?;
            result
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("Received ctrl-c");
            server.shutdown()?;
            Ok(())
        }
    }
}
