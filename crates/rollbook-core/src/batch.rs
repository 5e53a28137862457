//! Batch mutations: apply one operation to every student named in a posted
//! list of raw identifiers.
//!
//! The roster is fetched once per batch. Identifiers that fail to parse are
//! skipped, identifiers that match nobody are ignored, and a failing mutation
//! is logged without aborting the rest of the batch. Only a failure to read
//! the roster is returned to the caller.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  store::StudentStore,
  student::StudentId,
};

/// The operation applied to each matched student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOp {
  Delete,
  Submit,
  Unsubmit,
}

impl BatchOp {
  /// The view a client is sent to once the batch has run.
  pub fn success_target(self) -> &'static str {
    match self {
      BatchOp::Delete => "/stulist/",
      BatchOp::Submit | BatchOp::Unsubmit => "/submitted/",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BatchOp::Delete => "delete",
      BatchOp::Submit => "submit",
      BatchOp::Unsubmit => "unsubmit",
    }
  }

  async fn apply<S: StudentStore>(self, store: &S, id: StudentId) -> Result<(), S::Error> {
    match self {
      BatchOp::Delete => store.delete(id).await,
      BatchOp::Submit => store.mark_submitted(id).await,
      BatchOp::Unsubmit => store.mark_unsubmitted(id).await,
    }
  }
}

/// Tally of what a batch did with each posted identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
  /// Mutations that reached the store and succeeded.
  pub applied:   usize,
  /// Identifiers that did not parse.
  pub skipped:   usize,
  /// Well-formed identifiers with no matching student.
  pub unmatched: usize,
  /// Mutations the store rejected.
  pub failed:    usize,
}

/// Run `op` against every student named in `raw_ids`.
pub async fn process_batch<S, I>(store: &S, op: BatchOp, raw_ids: I) -> Result<BatchReport, S::Error>
where
  S: StudentStore,
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  let known: HashSet<StudentId> = store
    .list_all()
    .await?
    .into_iter()
    .map(|s| s.id)
    .collect();

  let mut report = BatchReport::default();

  for raw in raw_ids {
    let id = match StudentId::parse(raw.as_ref()) {
      Ok(id) => id,
      Err(e) => {
        tracing::debug!(op = op.as_str(), "skipping identifier: {e}");
        report.skipped += 1;
        continue;
      }
    };

    if !known.contains(&id) {
      report.unmatched += 1;
      continue;
    }

    match op.apply(store, id.clone()).await {
      Ok(()) => report.applied += 1,
      Err(e) => {
        tracing::warn!(op = op.as_str(), student = %id, "batch mutation failed: {e}");
        report.failed += 1;
      }
    }
  }

  if report.skipped > 0 {
    tracing::warn!(op = op.as_str(), skipped = report.skipped, "malformed identifiers in batch");
  }
  tracing::info!(
    op        = op.as_str(),
    applied   = report.applied,
    skipped   = report.skipped,
    unmatched = report.unmatched,
    failed    = report.failed,
    "batch processed"
  );

  Ok(report)
}
