//! Store coordinates and the schema bootstrapper.

use std::path::PathBuf;

use serde::Deserialize;

use crate::{Error, Result, SqliteStore, schema::TABLE_SQL_DEFINITIONS};

/// Where the roster database lives, and where to find its schema.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Directory holding the database file.
  #[serde(default = "default_dir")]
  pub dir:        PathBuf,
  /// Database file name inside [`dir`](Self::dir).
  #[serde(default = "default_file")]
  pub file:       String,
  /// Directory containing a `tables.sql` to run at startup. When unset the
  /// database is assumed to have been bootstrapped already.
  #[serde(default)]
  pub schema_dir: Option<PathBuf>,
}

fn default_dir() -> PathBuf { PathBuf::from("/data") }

fn default_file() -> String { "rollbook.sqlite".to_owned() }

impl Default for StoreConfig {
  fn default() -> Self {
    Self { dir: default_dir(), file: default_file(), schema_dir: None }
  }
}

impl StoreConfig {
  pub fn path(&self) -> PathBuf { self.dir.join(&self.file) }
}

/// Opens connections to the roster database.
///
/// Cheap to clone; holds no connection itself.
#[derive(Debug, Clone)]
pub struct Database {
  config: StoreConfig,
}

impl Database {
  pub fn new(config: StoreConfig) -> Self { Self { config } }

  pub fn config(&self) -> &StoreConfig { &self.config }

  pub fn path(&self) -> PathBuf { self.config.path() }

  /// Open the database, creating the file if needed, and run the configured
  /// schema definitions when a schema directory is set.
  ///
  /// Used once at startup. Statements that succeeded before a failing one are
  /// not rolled back.
  pub async fn open(&self) -> Result<SqliteStore> {
    tokio::fs::create_dir_all(&self.config.dir).await?;
    let store = SqliteStore::open(self.path()).await?;

    if let Some(dir) = &self.config.schema_dir {
      let path = dir.join(TABLE_SQL_DEFINITIONS);
      let source = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| Error::SchemaFile { path: path.clone(), source })?;
      store.apply_schema_source(source).await?;
      tracing::info!(schema = %path.display(), db = %self.path().display(), "schema applied");
    }

    Ok(store)
  }

  /// Like [`open`](Self::open), but falls back to the built-in schema when no
  /// schema directory is configured.
  pub async fn init(&self) -> Result<SqliteStore> {
    let store = self.open().await?;
    if self.config.schema_dir.is_none() {
      store.init_schema().await?;
      tracing::info!(db = %self.path().display(), "built-in schema applied");
    }
    Ok(store)
  }

  /// Open a fresh connection for one unit of work. No schema is applied.
  pub async fn connect(&self) -> Result<SqliteStore> { SqliteStore::open(self.path()).await }
}
