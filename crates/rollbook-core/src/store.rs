//! The `StudentStore` trait.
//!
//! Implemented by storage backends (e.g. `rollbook-store-sqlite`). The batch
//! processor and the HTTP layers are written against this abstraction.

use std::future::Future;

use crate::student::{RowId, Student, StudentId};

/// Abstraction over a live connection to the student roster.
///
/// "Not found" is never an error: lookups return `None` (or a placeholder),
/// and mutations of an absent student are no-ops.
pub trait StudentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Surrogate key of the student with business key `id`, if any.
  fn find_by_id(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Option<RowId>, Self::Error>> + Send + '_;

  /// Insert a student, or return the existing surrogate when `id` is taken.
  ///
  /// New rows start unsubmitted, with `submission_time` set to now.
  fn create(
    &self,
    id: StudentId,
    name: String,
  ) -> impl Future<Output = Result<RowId, Self::Error>> + Send + '_;

  /// Change the business key and name of the student keyed by `old_id`.
  ///
  /// Fails if `new_id` differs from `old_id` and already belongs to another
  /// student.
  fn rename(
    &self,
    old_id: StudentId,
    new_id: StudentId,
    name: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Physically remove the student.
  fn delete(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn mark_submitted(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn mark_unsubmitted(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every student, oldest `submission_time` first.
  fn list_all(&self) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Submitted students only, in the same order as [`list_all`](Self::list_all).
  fn list_submitted(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Fetch a single student.
  fn get(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Like [`get`](Self::get), but yields [`Student::placeholder`] on a miss.
  fn get_or_placeholder(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_ {
    async move { Ok(self.get(id).await?.unwrap_or_else(Student::placeholder)) }
  }
}
