//! Add / edit student form.
//!
//! `GET /input/` shows an empty form, `GET /input/?student=<id>` a form
//! pre-filled for renaming. `POST /input/` creates a student when no
//! `original` id is posted and renames `original` otherwise.

use axum::{
  Form,
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};
use rollbook_core::{store::StudentStore, student::StudentId};
use rollbook_store_sqlite::Error as StoreError;
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  render::{ACK_SAVED, StudentForm},
};

/// List page a successful save redirects to.
const AFTER_SAVE: &str = "/stulist/";

#[derive(Debug, Default, Deserialize)]
pub struct InputParams {
  pub student: Option<String>,
}

/// `GET /input/[?student=<id>]`
pub async fn show(
  State(state): State<AppState>,
  Query(params): Query<InputParams>,
) -> Result<Html<String>, Error> {
  let form = match params.student.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    None => StudentForm::default(),
    Some(raw) => match StudentId::parse(raw) {
      Err(e) => StudentForm { error: Some(e.to_string()), ..StudentForm::default() },
      Ok(id) => match state.db.connect().await?.get(id).await? {
        Some(student) => StudentForm::editing(&student),
        None => StudentForm {
          error: Some(format!("No student with id {raw}")),
          ..StudentForm::default()
        },
      },
    },
  };

  Ok(Html(state.renderer.student_form(&form)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct InputForm {
  #[serde(default)]
  pub original: String,
  #[serde(default)]
  pub id:       String,
  #[serde(default)]
  pub name:     String,
}

/// `POST /input/`
pub async fn save(
  State(state): State<AppState>,
  Form(input): Form<InputForm>,
) -> Result<Response, Error> {
  let original = Some(input.original.trim()).filter(|s| !s.is_empty()).map(str::to_owned);
  let mut form = StudentForm {
    original: original.clone(),
    id: input.id.clone(),
    name: input.name.clone(),
    ..StudentForm::default()
  };

  let new_id = match StudentId::parse(&input.id) {
    Ok(id) => id,
    Err(e) => return reject(&state, form, e.to_string()),
  };
  let name = input.name.trim().to_owned();
  if name.is_empty() {
    return reject(&state, form, "Name must not be empty".into());
  }

  let store = state.db.connect().await?;

  match original {
    None => {
      let row_id = store.create(new_id.clone(), name).await?;
      tracing::info!(student = %new_id, %row_id, "student saved");
    }
    Some(raw) => {
      let old_id = match StudentId::parse(&raw) {
        Ok(id) => id,
        Err(e) => return reject(&state, form, e.to_string()),
      };
      if store.find_by_id(old_id.clone()).await?.is_none() {
        form.original = None;
        return reject(&state, form, format!("No student with id {old_id}"));
      }
      match store.rename(old_id.clone(), new_id.clone(), name).await {
        Ok(()) => tracing::info!(from = %old_id, to = %new_id, "student renamed"),
        Err(StoreError::DuplicateStudent(id)) => {
          return reject(&state, form, format!("Student id {id} is already in use"));
        }
        Err(e) => return Err(e.into()),
      }
    }
  }

  Ok(Redirect::to(&format!("{AFTER_SAVE}?ack={ACK_SAVED}")).into_response())
}

fn reject(state: &AppState, form: StudentForm, error: String) -> Result<Response, Error> {
  let form = StudentForm { error: Some(error), ..form };
  let page = state.renderer.student_form(&form)?;
  Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response())
}
