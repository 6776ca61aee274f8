use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use bookshelf::Server;
use bookshelf::config::{Config, LogConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Bookshelf server
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "In-memory book catalog over HTTP")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address (host:port), overrides the config file
    #[arg(short, long)]
    addr: Option<String>,
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
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
                .with_context(|| format!("Failed to open log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.addr {
        config.server_addr = addr;
    }

    init_logging(&config.log)?;

    info!("Starting Bookshelf - in-memory book catalog");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let server = Server::bind(&config).await?;
    info!("Server listening on: {}", server.local_addr());

    server.run().await?;

    info!("Server stopped");
    Ok(())
}
