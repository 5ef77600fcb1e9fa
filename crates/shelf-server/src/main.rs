//! shelf-server binary.
//!
//! Reads `shelf.toml` (or the path given with `--config`) layered under
//! `SHELF_*` environment variables, opens the configured backend, and serves
//! the JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use shelf_server::{Backend, LogFormat, ServerConfig};
use shelf_store_document::DocumentStore;
use shelf_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Shelf catalog and activity server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "shelf.toml")]
  config: PathBuf,

  /// Override the configured storage backend.
  #[arg(long, value_enum)]
  backend: Option<Backend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let mut cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  if let Some(backend) = cli.backend {
    cfg.backend = backend;
  }

  init_tracing(cfg.log_format);

  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(backend = ?cfg.backend, "Listening on http://{address}");

  match cfg.backend {
    Backend::Sqlite => {
      let path = cfg.sqlite_path();
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      shelf_server::serve(store, listener).await
    }
    Backend::Document => {
      let path = cfg.document_path();
      let store = DocumentStore::open(&path)
        .await
        .with_context(|| format!("failed to open indices at {path:?}"))?;
      shelf_server::serve(store, listener).await
    }
  }
  .context("server error")?;

  Ok(())
}

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  match format {
    LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
  }
}
