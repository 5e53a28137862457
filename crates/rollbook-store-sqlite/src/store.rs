//! [`SqliteStore`]: the SQLite implementation of [`StudentStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rollbook_core::{
  store::StudentStore,
  student::{RowId, Student, StudentId},
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  encode::{RawStudent, STUDENT_COLUMNS},
  schema::{SCHEMA, statements},
  Error, Result,
};

/// How long a connection waits on another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A live connection to the roster database.
///
/// The underlying SQLite connection is closed when the last clone is dropped,
/// so a store scoped to a request is released on every exit path.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database file at `path`. No schema is applied.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  /// Open an in-memory store with the built-in schema, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure().await?;
    store.init_schema().await?;
    Ok(store)
  }

  async fn configure(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Apply the built-in [`SCHEMA`].
  pub async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Execute a schema-definitions source one statement at a time.
  ///
  /// Each statement commits on its own; on failure the statements that
  /// already ran are kept and the error is returned.
  pub async fn apply_schema_source(&self, source: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        for stmt in statements(&source) {
          conn.execute_batch(stmt)?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the connection, reporting any error SQLite raises while doing so.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn set_status(&self, id: StudentId, submitted: bool) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE Student SET submission_status = ?1 WHERE stuid = ?2",
          rusqlite::params![submitted, id.as_str()],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_students(&self, sql: String) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawStudent::into_student).collect())
  }
}

// ─── StudentStore impl ───────────────────────────────────────────────────────

impl StudentStore for SqliteStore {
  type Error = Error;

  async fn find_by_id(&self, id: StudentId) -> Result<Option<RowId>> {
    let row_id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT row_id FROM Student WHERE stuid = ?1",
              rusqlite::params![id.as_str()],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row_id.map(RowId))
  }

  async fn create(&self, id: StudentId, name: String) -> Result<RowId> {
    let now = Utc::now().timestamp();
    let log_id = id.clone();

    // The duplicate check and the insert share one write transaction, and the
    // new key comes back from the INSERT itself.
    let (row_id, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
          .query_row(
            "SELECT row_id FROM Student WHERE stuid = ?1",
            rusqlite::params![id.as_str()],
            |r| r.get(0),
          )
          .optional()?;
        if let Some(row_id) = existing {
          return Ok((row_id, false));
        }

        let row_id: i64 = tx.query_row(
          "INSERT INTO Student (stuid, name, submission_status, submission_time)
           VALUES (?1, ?2, 0, ?3)
           RETURNING row_id",
          rusqlite::params![id.as_str(), name, now],
          |r| r.get(0),
        )?;
        tx.commit()?;
        Ok((row_id, true))
      })
      .await?;

    if created {
      tracing::debug!(student = %log_id, row_id, "student created");
    }
    Ok(RowId(row_id))
  }

  async fn rename(&self, old_id: StudentId, new_id: StudentId, name: String) -> Result<()> {
    let target = new_id.clone();

    let renamed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if old_id != new_id {
          let taken = tx
            .query_row(
              "SELECT 1 FROM Student WHERE stuid = ?1",
              rusqlite::params![new_id.as_str()],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if taken {
            return Ok(false);
          }
        }

        tx.execute(
          "UPDATE Student SET stuid = ?1, name = ?2 WHERE stuid = ?3",
          rusqlite::params![new_id.as_str(), name, old_id.as_str()],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if renamed { Ok(()) } else { Err(Error::DuplicateStudent(target)) }
  }

  async fn delete(&self, id: StudentId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM Student WHERE stuid = ?1",
          rusqlite::params![id.as_str()],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn mark_submitted(&self, id: StudentId) -> Result<()> { self.set_status(id, true).await }

  async fn mark_unsubmitted(&self, id: StudentId) -> Result<()> { self.set_status(id, false).await }

  async fn list_all(&self) -> Result<Vec<Student>> {
    self
      .query_students(format!(
        "SELECT {STUDENT_COLUMNS} FROM Student ORDER BY submission_time ASC, row_id ASC"
      ))
      .await
  }

  async fn list_submitted(&self) -> Result<Vec<Student>> {
    self
      .query_students(format!(
        "SELECT {STUDENT_COLUMNS} FROM Student
         WHERE submission_status = 1
         ORDER BY submission_time ASC, row_id ASC"
      ))
      .await
  }

  async fn get(&self, id: StudentId) -> Result<Option<Student>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {STUDENT_COLUMNS} FROM Student WHERE stuid = ?1"),
              rusqlite::params![id.as_str()],
              RawStudent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawStudent::into_student))
  }
}
