//! `POST /remove/`: asynchronous single-student delete.
//!
//! Always answers `200 OK` with an [`AjaxAck`]; failures are reported in its
//! `err` field rather than through the status code.

use axum::{Form, Json, extract::State};
use rollbook_core::{store::StudentStore, student::StudentId};
use serde::{Deserialize, Serialize};

use crate::{AppState, handlers::form_value};

pub const STUDENT_ID_FIELD: &str = "studentId";

pub const BAD_REQUEST: &str = "Sorry, that is an invalid request";
pub const BAD_POST: &str = "Sorry, we cannot respond to that request. Please try again.";
pub const MISSING_ID: &str = "Missing student id";
pub const NO_SUCH_STUDENT: &str = "No such student";
pub const OK: &str = "Ok";

/// Reply to an ajax request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjaxAck {
  #[serde(rename = "msg")]
  pub message: String,
  #[serde(rename = "err", default, skip_serializing_if = "String::is_empty")]
  pub error:   String,
}

impl AjaxAck {
  pub fn ok() -> Self { Self { message: OK.to_owned(), error: String::new() } }

  pub fn err(error: impl Into<String>) -> Self {
    Self { message: String::new(), error: error.into() }
  }
}

/// `POST /remove/` with `studentId=<id>`.
pub async fn handler(
  State(state): State<AppState>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Json<AjaxAck> {
  Json(remove(&state, &fields).await)
}

/// Any other method on `/remove/`.
pub async fn bad_request() -> Json<AjaxAck> { Json(AjaxAck::err(BAD_REQUEST)) }

async fn remove(state: &AppState, fields: &[(String, String)]) -> AjaxAck {
  let Some(raw) = form_value(fields, STUDENT_ID_FIELD) else {
    return AjaxAck::err(BAD_POST);
  };
  if raw.trim().is_empty() {
    return AjaxAck::err(MISSING_ID);
  }
  let id = match StudentId::parse(raw) {
    Ok(id) => id,
    Err(e) => return AjaxAck::err(e.to_string()),
  };

  let store = match state.db.connect().await {
    Ok(store) => store,
    Err(e) => return AjaxAck::err(e.to_string()),
  };

  let target = match store.get_or_placeholder(id.clone()).await {
    Ok(student) => student,
    Err(e) => return AjaxAck::err(e.to_string()),
  };
  if target.is_placeholder() {
    return AjaxAck::err(NO_SUCH_STUDENT);
  }

  match store.delete(id).await {
    Ok(()) => {
      tracing::info!(student = %target.id, "student removed");
      AjaxAck::ok()
    }
    Err(e) => AjaxAck::err(e.to_string()),
  }
}
