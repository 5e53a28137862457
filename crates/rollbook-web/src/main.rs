//! rollbook server binary.
//!
//! Reads `rollbook.toml` (or the path given with `--config`) layered under
//! `ROLLBOOK_*` environment variables, then serves the roster over HTTP,
//! bootstraps the database, or reads barcode scans from stdin.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rollbook_store_sqlite::Database;
use rollbook_web::{AppState, ServerConfig, render::Renderer, scan::scan};
use tokio::{io::BufReader, net::TcpListener};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Assignment submission roster")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rollbook.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
  /// Bootstrap the database and serve HTTP (default).
  #[default]
  Serve,
  /// Bootstrap the database and exit.
  Init,
  /// Mark students submitted from ids read one per line on stdin.
  Scan,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let mut server_cfg = load_config(&cli.config)?;
  server_cfg.store.dir = expand_tilde(&server_cfg.store.dir);

  let database = Database::new(server_cfg.store.clone());

  match cli.command.unwrap_or_default() {
    Command::Serve => serve(database, server_cfg).await,
    Command::Init => {
      database
        .init()
        .await
        .with_context(|| format!("failed to initialise {:?}", database.path()))?
        .close()
        .await?;
      tracing::info!(db = %database.path().display(), "database ready");
      Ok(())
    }
    Command::Scan => {
      let store = database
        .open()
        .await
        .with_context(|| format!("failed to open store at {:?}", database.path()))?;
      tracing::info!("reading scans from stdin");
      let report = scan(&store, BufReader::new(tokio::io::stdin()))
        .await
        .context("scanner stopped")?;
      tracing::info!(
        submitted = report.submitted,
        unknown = report.unknown,
        malformed = report.malformed,
        "scan finished"
      );
      store.close().await?;
      Ok(())
    }
  }
}

async fn serve(database: Database, server_cfg: ServerConfig) -> anyhow::Result<()> {
  // Bootstrap once; request handlers open their own connections.
  database
    .open()
    .await
    .with_context(|| format!("failed to open store at {:?}", database.path()))?
    .close()
    .await?;

  let renderer = Renderer::load(server_cfg.templates_dir.as_deref())
    .context("failed to load templates")?;

  let state = AppState {
    db:       database,
    renderer: Arc::new(renderer),
    config:   Arc::new(server_cfg.clone()),
  };

  let app = rollbook_web::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("ROLLBOOK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
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
