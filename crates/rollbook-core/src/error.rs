//! Error types for `rollbook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid student id {raw:?}: {reason}")]
  InvalidStudentId { raw: String, reason: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
