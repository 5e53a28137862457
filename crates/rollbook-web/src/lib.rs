//! HTML front end for rollbook.
//!
//! Exposes an axum [`Router`] serving the roster pages, the bulk form
//! actions, the ajax remove endpoint, the JSON API under `/api`, and static
//! assets.

pub mod error;
pub mod handlers;
pub mod render;
pub mod scan;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::State,
  response::{Html, IntoResponse, Redirect, Response},
  routing::{get, post},
};
use rollbook_store_sqlite::{Database, StoreConfig};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use handlers::{batch, input, list, remove};
use render::Renderer;

/// Asset subdirectories served verbatim from `assets_dir`.
pub const ASSET_DIRS: [&str; 4] = ["css", "js", "fonts", "images"];

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `rollbook.toml` and
/// `ROLLBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// Directory holding static HTML pages such as the unsupported-browser page.
  #[serde(default)]
  pub templates_dir: Option<PathBuf>,
  /// Directory with `css/`, `js/`, `fonts/` and `images/` subdirectories.
  #[serde(default)]
  pub assets_dir:    Option<PathBuf>,
  #[serde(default)]
  pub store:         StoreConfig,
}

fn default_host() -> String { "localhost".to_owned() }

fn default_port() -> u16 { 8080 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          default_host(),
      port:          default_port(),
      templates_dir: None,
      assets_dir:    None,
      store:         StoreConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub db:       Database,
  pub renderer: Arc<Renderer>,
  pub config:   Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the web app.
pub fn router(state: AppState) -> Router {
  let assets_dir = state.config.assets_dir.clone();
  let api = rollbook_api::api_router(state.db.clone());

  let mut app = Router::new()
    .route("/", get(|| async { Redirect::to("/stulist/") }))
    .route("/browser", get(unsupported_browser))
    .route("/stulist/", get(list::all))
    .route("/submitted/", get(list::submitted))
    .route("/input/", get(input::show).post(input::save))
    .route("/delete/", post(batch::delete))
    .route("/submit/", post(batch::submit))
    .route("/unsubmit/", post(batch::unsubmit))
    .route("/remove/", post(remove::handler).get(remove::bad_request))
    .with_state(state)
    .nest("/api", api);

  if let Some(dir) = assets_dir {
    for sub in ASSET_DIRS {
      app = app.nest_service(&format!("/{sub}"), ServeDir::new(dir.join(sub)));
    }
  }

  app.layer(TraceLayer::new_for_http())
}

async fn unsupported_browser(State(state): State<AppState>) -> Response {
  match state.renderer.unsupported_browser() {
    Some(page) => Html(page.to_owned()).into_response(),
    None => Error::NotFound.into_response(),
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
