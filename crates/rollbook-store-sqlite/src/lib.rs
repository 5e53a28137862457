//! SQLite backend for the rollbook student roster.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. [`Database`] holds the
//! on-disk coordinates and hands out one [`SqliteStore`] connection per
//! request.

mod database;
mod encode;
mod schema;
mod store;

pub mod error;

pub use database::{Database, StoreConfig};
pub use error::{Error, Result};
pub use schema::{SCHEMA, TABLE_SQL_DEFINITIONS};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
