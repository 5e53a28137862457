//! Bulk form actions: delete, submit and unsubmit every checked student.
//!
//! The form posts one `student=<id>` pair per checked row. Whatever happens
//! to the individual ids, the client is redirected to the action's list
//! page; only a failure to reach the database becomes an error response.

use axum::{Form, extract::State, response::Redirect};
use rollbook_core::batch::{BatchOp, process_batch};

use crate::{AppState, error::Error, handlers::form_values};

/// Form field carrying one student id per checked row.
pub const STUDENT_FIELD: &str = "student";

/// `POST /delete/`
pub async fn delete(
  State(state): State<AppState>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, Error> {
  run(&state, BatchOp::Delete, fields).await
}

/// `POST /submit/`
pub async fn submit(
  State(state): State<AppState>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, Error> {
  run(&state, BatchOp::Submit, fields).await
}

/// `POST /unsubmit/`
pub async fn unsubmit(
  State(state): State<AppState>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, Error> {
  run(&state, BatchOp::Unsubmit, fields).await
}

async fn run(
  state:  &AppState,
  op:     BatchOp,
  fields: Vec<(String, String)>,
) -> Result<Redirect, Error> {
  let ids = form_values(fields, STUDENT_FIELD);
  let store = state.db.connect().await?;
  process_batch(&store, op, ids).await?;
  Ok(Redirect::to(op.success_target()))
}
