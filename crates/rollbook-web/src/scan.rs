//! Scanner input loop.
//!
//! Keyboard-wedge barcode scanners type the scanned code followed by a
//! newline. Each line naming a known student marks that student submitted;
//! anything else is logged and ignored.

use rollbook_core::{store::StudentStore, student::StudentId};
use rollbook_store_sqlite::SqliteStore;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
  pub submitted: usize,
  pub unknown:   usize,
  pub malformed: usize,
}

/// Consume `input` line by line until EOF.
pub async fn scan<R>(store: &SqliteStore, input: R) -> Result<ScanReport, Error>
where
  R: AsyncBufRead + Unpin,
{
  let mut report = ScanReport::default();
  let mut lines = input.lines();

  while let Some(line) = lines.next_line().await? {
    if line.trim().is_empty() {
      continue;
    }

    let id = match StudentId::parse(&line) {
      Ok(id) => id,
      Err(e) => {
        tracing::warn!("ignoring scan: {e}");
        report.malformed += 1;
        continue;
      }
    };

    if store.find_by_id(id.clone()).await?.is_none() {
      tracing::warn!(student = %id, "scanned id is not on the roster");
      report.unknown += 1;
      continue;
    }

    store.mark_submitted(id.clone()).await?;
    tracing::info!(student = %id, "marked submitted");
    report.submitted += 1;
  }

  Ok(report)
}
