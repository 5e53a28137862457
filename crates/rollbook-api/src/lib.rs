//! JSON REST API for rollbook.
//!
//! Exposes an axum [`Router`] over a [`Database`]. Every request opens its own
//! connection and drops it before the response is sent.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollbook_api::api_router(database.clone()))
//! ```

pub mod error;
pub mod students;

use axum::{
  Router,
  routing::{get, post},
};
use rollbook_store_sqlite::Database;

pub use error::ApiError;

/// Build the API router for `database`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(database: Database) -> Router<()> {
  Router::new()
    .route("/students", get(students::list).post(students::create))
    .route(
      "/students/{id}",
      get(students::get_one)
        .put(students::rename)
        .delete(students::delete_one),
    )
    .route("/students/{id}/submit", post(students::submit))
    .route("/students/{id}/unsubmit", post(students::unsubmit))
    .with_state(database)
}
