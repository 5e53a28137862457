//! Student list pages.

use axum::{
  extract::{Query, State},
  response::Html,
};
use rollbook_core::store::StudentStore;
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  render::{StudentPage, Tab},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Names a notice to show above the list, e.g. `saved`.
  pub ack: Option<String>,
}

/// `GET /stulist/`: every student, submitted or not.
pub async fn all(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>, Error> {
  page(&state, Tab::All, params).await
}

/// `GET /submitted/`
pub async fn submitted(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>, Error> {
  page(&state, Tab::Submitted, params).await
}

async fn page(state: &AppState, tab: Tab, params: ListParams) -> Result<Html<String>, Error> {
  let store = state.db.connect().await?;
  let students = match tab {
    Tab::All => store.list_all().await?,
    Tab::Submitted => store.list_submitted().await?,
  };

  let page = StudentPage::new(tab, students).with_ack(params.ack.as_deref());
  Ok(Html(state.renderer.student_list(&page)?))
}
