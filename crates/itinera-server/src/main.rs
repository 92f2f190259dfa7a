//! itinera-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the journey-sharing API over HTTP.
//!
//! # API token hash generation
//!
//! To generate the SHA-256 hex digest for an actor's `token_sha256` entry
//! in config.toml:
//!
//! ```
//! cargo run -p itinera-server --bin server -- --hash-token
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use itinera_api::AppState;
use itinera_core::{sharing::Sharing, token::TokenIssuer};
use itinera_store_sqlite::SqliteStore;
use sha2::{Digest as _, Sha256};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod identity;
mod notify;
mod settings;

use identity::ConfigIdentity;
use notify::LogNotifier;
use settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Itinera journey-sharing server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the SHA-256 hex digest for an API token entered on stdin and
  /// exit.
  #[arg(long)]
  hash_token: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash an API token and exit.
  if cli.hash_token {
    let token = read_token_from_stdin()?;
    println!("{}", hex::encode(Sha256::digest(token.as_bytes())));
    return Ok(());
  }

  // Load configuration.
  let loaded = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ITINERA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = loaded
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = Arc::new(
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?,
  );

  let identity = ConfigIdentity::from_entries(&server_cfg.actors)
    .context("invalid actor entry in config")?;

  // Build application state. The store doubles as the journey directory —
  // it reads the journeys table the owning application maintains.
  let sharing = Sharing::new(
    Arc::clone(&store),
    Arc::clone(&store),
    Arc::new(LogNotifier::new(&server_cfg.public_base_url)),
    TokenIssuer::default(),
  );
  let state = AppState { sharing, identity: Arc::new(identity) };

  let app = itinera_api::api_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read an API token from stdin.
fn read_token_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("API token: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
