//! The student record tracked by the roster.
//!
//! A student is keyed by its externally supplied [`StudentId`] (the business
//! key). The store additionally assigns a dense surrogate [`RowId`] which is
//! never used to identify a student from the outside.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Longest accepted student id, in characters.
pub const MAX_ID_LEN: usize = 64;

/// Id carried by [`Student::placeholder`].
pub const PLACEHOLDER_ID: &str = "-1";

// ─── StudentId ───────────────────────────────────────────────────────────────

/// A validated business key, e.g. a student number such as `"001"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
  /// Parse a raw, user-supplied identifier.
  ///
  /// Surrounding whitespace is trimmed. The remainder must be 1 to
  /// [`MAX_ID_LEN`] characters of ASCII letters, digits, `-` or `_`.
  pub fn parse(raw: &str) -> Result<Self> {
    let trimmed = raw.trim();
    let invalid = |reason| Error::InvalidStudentId { raw: raw.to_owned(), reason };

    if trimmed.is_empty() {
      return Err(invalid("empty"));
    }
    if trimmed.len() > MAX_ID_LEN {
      return Err(invalid("too long"));
    }
    if !trimmed
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
      return Err(invalid("unexpected character"));
    }
    Ok(Self(trimmed.to_owned()))
  }

  /// Wrap an id read back from storage without validating it.
  ///
  /// Rows written by other tools may hold ids that [`parse`](Self::parse)
  /// rejects. User input always goes through `parse`.
  pub fn from_stored(stored: String) -> Self { Self(stored) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for StudentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl std::str::FromStr for StudentId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl TryFrom<String> for StudentId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::parse(&value) }
}

impl From<StudentId> for String {
  fn from(id: StudentId) -> Self { id.0 }
}

impl AsRef<str> for StudentId {
  fn as_ref(&self) -> &str { &self.0 }
}

// ─── RowId ───────────────────────────────────────────────────────────────────

/// Store-assigned surrogate key. Always non-negative for stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub i64);

impl fmt::Display for RowId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Student ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub row_id:            RowId,
  pub id:                StudentId,
  pub name:              String,
  pub submission_status: bool,
  /// Unix seconds, set once when the row was created.
  pub submission_time:   i64,
}

impl Student {
  /// The stand-in returned by non-failing lookups when nothing matched.
  ///
  /// Its id is [`PLACEHOLDER_ID`] and its row id negative; see
  /// [`is_placeholder`](Self::is_placeholder).
  pub fn placeholder() -> Self {
    Self {
      row_id:            RowId(-1),
      id:                StudentId(PLACEHOLDER_ID.to_owned()),
      name:              String::new(),
      submission_status: false,
      submission_time:   0,
    }
  }

  pub fn is_placeholder(&self) -> bool { self.id.as_str() == PLACEHOLDER_ID && self.row_id.0 < 0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_trims_whitespace() {
    let id = StudentId::parse("  001\n").unwrap();
    assert_eq!(id.as_str(), "001");
  }

  #[test]
  fn parse_accepts_dashes_and_underscores() {
    assert!(StudentId::parse("2024-cs_17").is_ok());
  }

  #[test]
  fn parse_rejects_malformed_ids() {
    let long = "9".repeat(MAX_ID_LEN + 1);
    for raw in ["", "   ", "12 34", "<b>", "ünï", long.as_str()] {
      assert!(StudentId::parse(raw).is_err(), "accepted {raw:?}");
    }
  }

  #[test]
  fn try_from_string_validates() {
    let ok = StudentId::try_from("007".to_owned()).unwrap();
    assert_eq!(String::from(ok), "007");
    assert!(StudentId::try_from("not ok".to_owned()).is_err());
  }

  #[test]
  fn stored_ids_are_taken_verbatim() {
    let id = StudentId::from_stored(" 学号 7".to_owned());
    assert_eq!(id.as_str(), " 学号 7");
    assert!(StudentId::parse(id.as_str()).is_err());
  }

  #[test]
  fn placeholder_is_recognisable() {
    let p = Student::placeholder();
    assert!(p.is_placeholder());
    assert_eq!(p.id.as_str(), "-1");
  }
}
