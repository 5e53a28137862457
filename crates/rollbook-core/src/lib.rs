//! Core types and trait definitions for the rollbook student roster.
//!
//! This crate has no HTTP or database dependencies. The storage backend
//! (`rollbook-store-sqlite`) implements [`store::StudentStore`]; the web and
//! API layers depend on the trait and on the batch processor defined here.

pub mod batch;
pub mod error;
pub mod since;
pub mod store;
pub mod student;

pub use error::{Error, Result};
