//! Typed mapping between `Student` rows and [`Student`] values.
//!
//! Column values are read with their expected SQLite storage class; a row
//! holding anything else surfaces as [`Error::Decode`](crate::Error::Decode)
//! rather than being coerced.

use rollbook_core::student::{RowId, Student, StudentId};

/// Column list shared by every `SELECT` that produces a [`RawStudent`].
pub const STUDENT_COLUMNS: &str =
  "row_id, stuid, name, submission_status, submission_time";

/// Values read directly from a `Student` row.
pub struct RawStudent {
  pub row_id:            i64,
  pub stuid:             String,
  pub name:              String,
  pub submission_status: bool,
  pub submission_time:   i64,
}

impl RawStudent {
  /// Read a row selected with [`STUDENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      row_id:            row.get(0)?,
      stuid:             row.get(1)?,
      name:              row.get(2)?,
      submission_status: row.get(3)?,
      submission_time:   row.get(4)?,
    })
  }

  /// Stored ids are taken as they are; only the column types are checked.
  pub fn into_student(self) -> Student {
    Student {
      row_id: RowId(self.row_id),
      id: StudentId::from_stored(self.stuid),
      name: self.name,
      submission_status: self.submission_status,
      submission_time: self.submission_time,
    }
  }
}
