use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kvstore::config::{Config, LogConfig};
use kvstore::protocol::ByteStore;
use kvstore::server::Server;
use kvstore::store::Store;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Redis-compatible in-memory key-value server
#[derive(Debug, Parser)]
#[command(name = "kvstore", version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening address, overrides `server_addr` from the config file
    #[arg(long)]
    addr: Option<String>,

    /// Log level, overrides `log.level` from the config file
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(addr) = &self.addr {
            config.server_addr = addr.clone();
        }
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
        Ok(config)
    }
}

/// RUST_LOG takes precedence over the configured level
fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .with_context(|| format!("invalid log level '{}'", log.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match &log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file '{}'", path))?;
            builder.with_writer(Arc::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config.log)?;

    info!("Starting kvstore - Redis compatible KV store");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let store: Arc<ByteStore> = Arc::new(Store::<Vec<u8>, Vec<u8>>::new());
    let server = Server::bind(&config.server_addr, store)
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?
        .with_query_buffer_limit(config.client_query_buffer_limit);
    info!("Server listening on: {}", server.local_addr());

    Arc::new(server)
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Server stopped");
    Ok(())
}
