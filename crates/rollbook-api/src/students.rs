//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | Optional `?submitted=true` |
//! | `POST`   | `/students` | Body: `{"id":"001","name":"Alice"}`; 201, or 200 if the id exists |
//! | `GET`    | `/students/:id` | 404 if not found |
//! | `PUT`    | `/students/:id` | Body: `{"id":"002","name":"Alice"}`; 409 if the new id is taken |
//! | `DELETE` | `/students/:id` | 204, also when absent |
//! | `POST`   | `/students/:id/submit` | 204 |
//! | `POST`   | `/students/:id/unsubmit` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollbook_core::{
  store::StudentStore,
  student::{Student, StudentId},
};
use rollbook_store_sqlite::Database;
use serde::Deserialize;

use crate::error::ApiError;

fn parse_name(raw: &str) -> Result<String, ApiError> {
  let name = raw.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  Ok(name.to_owned())
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub submitted: bool,
}

/// `GET /students[?submitted=true]`
pub async fn list(
  State(db): State<Database>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
  let store = db.connect().await?;
  let students = if params.submitted {
    store.list_submitted().await?
  } else {
    store.list_all().await?
  };
  Ok(Json(students))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StudentBody {
  pub id:   String,
  pub name: String,
}

/// `POST /students`, body: `{"id":"001","name":"Alice"}`
///
/// `201 Created` for a new student. Creating an id that already exists
/// answers `200 OK` with the existing student, unchanged.
pub async fn create(
  State(db): State<Database>,
  Json(body): Json<StudentBody>,
) -> Result<impl IntoResponse, ApiError> {
  let id = StudentId::parse(&body.id)?;
  let name = parse_name(&body.name)?;

  let store = db.connect().await?;
  let existing = store.get(id.clone()).await?;
  let row_id = store.create(id.clone(), name).await?;

  // Another writer may have inserted the id between the lookup and `create`.
  let status = match existing {
    Some(ref s) if s.row_id == row_id => StatusCode::OK,
    _ => StatusCode::CREATED,
  };
  let student = store
    .get(id.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} vanished after create")))?;
  Ok((status, Json(student)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/:id`
pub async fn get_one(
  State(db): State<Database>,
  Path(id): Path<String>,
) -> Result<Json<Student>, ApiError> {
  let id = StudentId::parse(&id)?;
  let student = db
    .connect()
    .await?
    .get(id.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(student))
}

// ─── Rename ───────────────────────────────────────────────────────────────────

/// `PUT /students/:id`, body: `{"id":"002","name":"Alice"}`
pub async fn rename(
  State(db): State<Database>,
  Path(id): Path<String>,
  Json(body): Json<StudentBody>,
) -> Result<Json<Student>, ApiError> {
  let old_id = StudentId::parse(&id)?;
  let new_id = StudentId::parse(&body.id)?;
  let name = parse_name(&body.name)?;

  let store = db.connect().await?;
  if store.find_by_id(old_id.clone()).await?.is_none() {
    return Err(ApiError::NotFound(format!("student {old_id} not found")));
  }
  store.rename(old_id, new_id.clone(), name).await?;

  let student = store
    .get(new_id.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("student {new_id} not found")))?;
  Ok(Json(student))
}

// ─── Delete / status ──────────────────────────────────────────────────────────

/// `DELETE /students/:id`
pub async fn delete_one(
  State(db): State<Database>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let id = StudentId::parse(&id)?;
  db.connect().await?.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /students/:id/submit`
pub async fn submit(
  State(db): State<Database>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let id = StudentId::parse(&id)?;
  db.connect().await?.mark_submitted(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /students/:id/unsubmit`
pub async fn unsubmit(
  State(db): State<Database>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let id = StudentId::parse(&id)?;
  db.connect().await?.mark_unsubmitted(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, header},
  };
  use rollbook_store_sqlite::StoreConfig;
  use tower::ServiceExt as _;

  use super::*;
  use crate::api_router;

  async fn database(tmp: &tempfile::TempDir) -> Database {
    let db = Database::new(StoreConfig {
      dir:        tmp.path().to_path_buf(),
      file:       "api.sqlite".into(),
      schema_dir: None,
    });
    db.init().await.unwrap();
    db
  }

  async fn call(
    db: &Database,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
  ) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp = api_router(db.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  #[tokio::test]
  async fn create_then_get() {
    let tmp = tempfile::tempdir().unwrap();
    let db = database(&tmp).await;

    let (status, created) = call(
      &db,
      "POST",
      "/students",
      Some(serde_json::json!({ "id": "001", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "001");
    assert_eq!(created["submission_status"], false);

    let (status, fetched) = call(&db, "GET", "/students/001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Alice");
    assert_eq!(fetched["row_id"], created["row_id"]);
  }

  #[tokio::test]
  async fn creating_an_existing_id_is_ok_not_created() {
    let tmp = tempfile::tempdir().unwrap();
    let db = database(&tmp).await;

    let (status, first) = call(
      &db,
      "POST",
      "/students",
      Some(serde_json::json!({ "id": "001", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, again) = call(
      &db,
      "POST",
      "/students",
      Some(serde_json::json!({ "id": "001", "name": "Someone Else" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["row_id"], first["row_id"]);
    assert_eq!(again["name"], "Alice");
  }

  #[tokio::test]
  async fn invalid_id_is_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let db = database(&tmp).await;

    let (status, body) = call(
      &db,
      "POST",
      "/students",
      Some(serde_json::json!({ "id": "no spaces", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid student id"));
  }

  #[tokio::test]
  async fn submitted_filter_and_status_endpoints() {
    let tmp = tempfile::tempdir().unwrap();
    let db = database(&tmp).await;
    for (id, name) in [("001", "Alice"), ("002", "Bob")] {
      call(&db, "POST", "/students", Some(serde_json::json!({ "id": id, "name": name }))).await;
    }

    let (status, _) = call(&db, "POST", "/students/002/submit", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, submitted) = call(&db, "GET", "/students?submitted=true", None).await;
    let ids: Vec<_> = submitted.as_array().unwrap().iter().map(|s| s["id"].clone()).collect();
    assert_eq!(ids, vec!["002"]);

    call(&db, "POST", "/students/002/unsubmit", None).await;
    let (_, submitted) = call(&db, "GET", "/students?submitted=true", None).await;
    assert!(submitted.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn rename_conflict_and_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let db = database(&tmp).await;
    for (id, name) in [("001", "Alice"), ("002", "Bob")] {
      call(&db, "POST", "/students", Some(serde_json::json!({ "id": id, "name": name }))).await;
    }

    let (status, _) = call(
      &db,
      "PUT",
      "/students/001",
      Some(serde_json::json!({ "id": "002", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
      &db,
      "PUT",
      "/students/404",
      Some(serde_json::json!({ "id": "405", "name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, renamed) = call(
      &db,
      "PUT",
      "/students/001",
      Some(serde_json::json!({ "id": "101", "name": "Alice L." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["id"], "101");
  }

  #[tokio::test]
  async fn delete_then_get_is_404() {
    let tmp = tempfile::tempdir().unwrap();
    let db = database(&tmp).await;
    call(&db, "POST", "/students", Some(serde_json::json!({ "id": "001", "name": "Alice" }))).await;

    let (status, _) = call(&db, "DELETE", "/students/001", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&db, "DELETE", "/students/001", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&db, "GET", "/students/001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
