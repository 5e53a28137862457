//! Error type for `rollbook-store-sqlite`.

use std::path::PathBuf;

use rollbook_core::student::StudentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rollbook_core::Error),

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  /// A column held a value of the wrong storage type.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("cannot read schema definitions {path:?}: {source}")]
  SchemaFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A rename would give two students the same id.
  #[error("student id already in use: {0}")]
  DuplicateStudent(StudentId),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    use rusqlite::Error as Sql;

    match err {
      tokio_rusqlite::Error::Rusqlite(Sql::InvalidColumnType(idx, name, ty)) => {
        Error::Decode(format!("column {name:?} (#{idx}) holds {ty}"))
      }
      tokio_rusqlite::Error::Rusqlite(Sql::FromSqlConversionFailure(idx, ty, e)) => {
        Error::Decode(format!("column #{idx} ({ty}): {e}"))
      }
      tokio_rusqlite::Error::Rusqlite(Sql::IntegralValueOutOfRange(idx, v)) => {
        Error::Decode(format!("column #{idx}: {v} out of range"))
      }
      other => Error::Database(other),
    }
  }
}

impl From<rusqlite::Error> for Error {
  fn from(err: rusqlite::Error) -> Self { tokio_rusqlite::Error::Rusqlite(err).into() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
