//! SQL schema for the rollbook SQLite store.
//!
//! Every statement is guarded with `IF NOT EXISTS`, so bootstrapping an
//! existing database is a no-op.

/// Name of the schema-definitions file looked up in the configured schema
/// directory.
pub const TABLE_SQL_DEFINITIONS: &str = "tables.sql";

/// Built-in DDL, identical to the shipped `schema/tables.sql`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS Student (
    row_id            INTEGER PRIMARY KEY AUTOINCREMENT,
    stuid             TEXT    NOT NULL UNIQUE,
    name              TEXT    NOT NULL,
    submission_status INTEGER NOT NULL DEFAULT 0,   -- 0 | 1
    submission_time   INTEGER NOT NULL               -- unix seconds
);

CREATE INDEX IF NOT EXISTS student_time_idx ON Student(submission_time);
";

/// Split a schema source into the statements executed one at a time.
///
/// Splits naively on `;`, so definitions must not contain semicolons inside
/// string literals or trigger bodies.
pub fn statements(source: &str) -> impl Iterator<Item = &str> {
  source.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_schema_splits_into_three_statements() {
    let stmts: Vec<_> = statements(SCHEMA).collect();
    assert_eq!(stmts.len(), 3);
    assert!(stmts[0].starts_with("PRAGMA"));
    assert!(stmts[1].starts_with("CREATE TABLE IF NOT EXISTS Student"));
    assert!(stmts[2].starts_with("CREATE INDEX"));
  }

  #[test]
  fn blank_chunks_are_dropped() {
    let stmts: Vec<_> = statements(" ;\n;CREATE TABLE t (x);;  ").collect();
    assert_eq!(stmts, vec!["CREATE TABLE t (x)"]);
  }
}
