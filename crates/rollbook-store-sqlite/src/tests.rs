//! Integration tests for `SqliteStore` and `Database`.

use rollbook_core::{
  batch::{BatchOp, process_batch},
  store::StudentStore,
  student::StudentId,
};

use crate::{Database, Error, SqliteStore, StoreConfig};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sid(s: &str) -> StudentId { StudentId::parse(s).unwrap() }

/// Insert a row with an explicit timestamp, bypassing `create`.
async fn insert_at(s: &SqliteStore, stuid: &'static str, name: &'static str, time: i64) {
  s.conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO Student (stuid, name, submission_status, submission_time)
         VALUES (?1, ?2, 0, ?3)",
        rusqlite::params![stuid, name, time],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}

async fn row_count(s: &SqliteStore) -> i64 {
  s.conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM Student", [], |r| r.get(0))?))
    .await
    .unwrap()
}

fn names(students: &[rollbook_core::student::Student]) -> Vec<&str> {
  students.iter().map(|s| s.name.as_str()).collect()
}

// ─── Create / dedup ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_is_idempotent_per_id() {
  let s = store().await;

  let first = s.create(sid("001"), "Alice".into()).await.unwrap();
  let second = s.create(sid("001"), "Someone Else".into()).await.unwrap();

  assert_eq!(first, second);
  assert_eq!(row_count(&s).await, 1);

  let alice = s.get(sid("001")).await.unwrap().unwrap();
  assert_eq!(alice.name, "Alice");
}

#[tokio::test]
async fn create_assigns_distinct_non_negative_surrogates() {
  let s = store().await;

  let a = s.create(sid("001"), "Alice".into()).await.unwrap();
  let b = s.create(sid("002"), "Bob".into()).await.unwrap();

  assert_ne!(a, b);
  assert!(a.0 >= 0 && b.0 >= 0);
  assert_eq!(s.find_by_id(sid("002")).await.unwrap(), Some(b));
}

#[tokio::test]
async fn new_students_start_unsubmitted_with_a_timestamp() {
  let s = store().await;
  let before = chrono::Utc::now().timestamp();

  s.create(sid("001"), "Alice".into()).await.unwrap();

  let alice = s.get(sid("001")).await.unwrap().unwrap();
  assert!(!alice.submission_status);
  assert!(alice.submission_time >= before);
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  assert_eq!(s.find_by_id(sid("404")).await.unwrap(), None);
}

// ─── Status transitions ──────────────────────────────────────────────────────

#[tokio::test]
async fn submit_then_unsubmit_round_trips() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();
  let created_at = s.get(sid("001")).await.unwrap().unwrap().submission_time;

  s.mark_submitted(sid("001")).await.unwrap();
  let after_submit = s.get(sid("001")).await.unwrap().unwrap();
  assert!(after_submit.submission_status);
  assert_eq!(after_submit.submission_time, created_at);

  s.mark_submitted(sid("001")).await.unwrap();
  assert!(s.get(sid("001")).await.unwrap().unwrap().submission_status);

  s.mark_unsubmitted(sid("001")).await.unwrap();
  assert!(!s.get(sid("001")).await.unwrap().unwrap().submission_status);
}

#[tokio::test]
async fn status_changes_on_missing_students_are_no_ops() {
  let s = store().await;
  s.mark_submitted(sid("404")).await.unwrap();
  s.mark_unsubmitted(sid("404")).await.unwrap();
  assert_eq!(row_count(&s).await, 0);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_terminal_and_repeatable() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();

  s.delete(sid("001")).await.unwrap();
  assert_eq!(s.find_by_id(sid("001")).await.unwrap(), None);

  s.delete(sid("001")).await.unwrap();
  assert_eq!(row_count(&s).await, 0);
}

#[tokio::test]
async fn get_or_placeholder_distinguishes_hits_from_misses() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();

  let hit = s.get_or_placeholder(sid("001")).await.unwrap();
  assert_eq!(hit.id.as_str(), "001");

  let miss = s.get_or_placeholder(sid("002")).await.unwrap();
  assert_eq!(miss.id.as_str(), "-1");
  assert!(miss.is_placeholder());
}

// ─── Rename ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rename_changes_id_and_name() {
  let s = store().await;
  let row = s.create(sid("001"), "Alice".into()).await.unwrap();

  s.rename(sid("001"), sid("101"), "Alice L.".into()).await.unwrap();

  assert_eq!(s.find_by_id(sid("001")).await.unwrap(), None);
  let renamed = s.get(sid("101")).await.unwrap().unwrap();
  assert_eq!(renamed.name, "Alice L.");
  assert_eq!(renamed.row_id, row);
}

#[tokio::test]
async fn rename_keeping_id_updates_name() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();

  s.rename(sid("001"), sid("001"), "Alicia".into()).await.unwrap();

  assert_eq!(s.get(sid("001")).await.unwrap().unwrap().name, "Alicia");
}

#[tokio::test]
async fn rename_onto_existing_id_is_rejected() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();
  s.create(sid("002"), "Bob".into()).await.unwrap();

  let err = s.rename(sid("001"), sid("002"), "Alice".into()).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateStudent(ref id) if id.as_str() == "002"), "{err}");

  assert_eq!(s.get(sid("001")).await.unwrap().unwrap().name, "Alice");
  assert_eq!(s.get(sid("002")).await.unwrap().unwrap().name, "Bob");
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_are_ordered_by_submission_time() {
  let s = store().await;
  insert_at(&s, "003", "Carol", 300).await;
  insert_at(&s, "001", "Alice", 100).await;
  insert_at(&s, "002", "Bob", 200).await;
  insert_at(&s, "004", "Dave", 200).await;

  let all = s.list_all().await.unwrap();
  assert_eq!(names(&all), vec!["Alice", "Bob", "Dave", "Carol"]);
  assert!(all.windows(2).all(|w| w[0].submission_time <= w[1].submission_time));

  s.mark_submitted(sid("003")).await.unwrap();
  s.mark_submitted(sid("001")).await.unwrap();
  let submitted = s.list_submitted().await.unwrap();
  assert_eq!(names(&submitted), vec!["Alice", "Carol"]);
}

// ─── Decoding ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mistyped_column_is_a_decode_error() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO Student (stuid, name, submission_status, submission_time)
         VALUES ('001', 'Alice', 0, 'last tuesday')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.list_all().await.unwrap_err();
  assert!(matches!(err, Error::Decode(_)), "{err}");
}

#[tokio::test]
async fn externally_written_ids_still_list() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();
  insert_at(&s, "学号 7", "Legacy", i64::MAX).await;

  let all = s.list_all().await.unwrap();
  assert_eq!(names(&all), vec!["Alice", "Legacy"]);
  assert_eq!(all[1].id.as_str(), "学号 7");

  let report = process_batch(&s, BatchOp::Submit, ["001", "学号 7"]).await.unwrap();
  assert_eq!(report.applied, 1);
  assert_eq!(report.skipped, 1);
  assert_eq!(names(&s.list_submitted().await.unwrap()), vec!["Alice"]);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_then_batch_unsubmit_with_unknown_id() {
  let s = store().await;
  s.create(sid("001"), "Alice".into()).await.unwrap();
  s.create(sid("002"), "Bob".into()).await.unwrap();

  s.mark_submitted(sid("001")).await.unwrap();
  assert_eq!(names(&s.list_submitted().await.unwrap()), vec!["Alice"]);

  let report = process_batch(&s, BatchOp::Unsubmit, ["001", "999"]).await.unwrap();
  assert_eq!(report.applied, 1);
  assert_eq!(report.unmatched, 1);
  assert!(s.list_submitted().await.unwrap().is_empty());
}

// ─── Bootstrapping ───────────────────────────────────────────────────────────

fn config_in(dir: &tempfile::TempDir) -> StoreConfig {
  StoreConfig {
    dir:        dir.path().join("db"),
    file:       "test.sqlite".into(),
    schema_dir: None,
  }
}

#[tokio::test]
async fn init_creates_directory_and_schema() {
  let tmp = tempfile::tempdir().unwrap();
  let db = Database::new(config_in(&tmp));

  db.init().await.unwrap().close().await.unwrap();
  assert!(db.path().exists());

  let conn = db.connect().await.unwrap();
  conn.create(sid("001"), "Alice".into()).await.unwrap();
  drop(conn);

  let again = db.connect().await.unwrap();
  assert_eq!(again.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn schema_file_bootstrap_is_idempotent() {
  let tmp = tempfile::tempdir().unwrap();
  let schema_dir = tmp.path().join("schema");
  std::fs::create_dir_all(&schema_dir).unwrap();
  std::fs::write(schema_dir.join(crate::TABLE_SQL_DEFINITIONS), crate::SCHEMA).unwrap();

  let db = Database::new(StoreConfig { schema_dir: Some(schema_dir), ..config_in(&tmp) });

  let first = db.open().await.unwrap();
  first.create(sid("001"), "Alice".into()).await.unwrap();
  drop(first);

  let second = db.open().await.unwrap();
  assert_eq!(second.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_schema_file_is_reported() {
  let tmp = tempfile::tempdir().unwrap();
  let db = Database::new(StoreConfig {
    schema_dir: Some(tmp.path().join("nowhere")),
    ..config_in(&tmp)
  });

  let err = db.open().await.err().expect("open should fail");
  assert!(matches!(err, Error::SchemaFile { .. }), "{err}");
}

#[tokio::test]
async fn failing_statement_keeps_earlier_ones() {
  let tmp = tempfile::tempdir().unwrap();
  let schema_dir = tmp.path().join("schema");
  std::fs::create_dir_all(&schema_dir).unwrap();
  std::fs::write(
    schema_dir.join(crate::TABLE_SQL_DEFINITIONS),
    "CREATE TABLE IF NOT EXISTS kept (x INTEGER); THIS IS NOT SQL; CREATE TABLE never (y)",
  )
  .unwrap();

  let db = Database::new(StoreConfig { schema_dir: Some(schema_dir), ..config_in(&tmp) });
  assert!(db.open().await.is_err());

  let conn = db.connect().await.unwrap();
  let tables: Vec<String> = conn
    .conn
    .call(|conn| {
      let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
      let names = stmt
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
      Ok(names)
    })
    .await
    .unwrap();
  assert_eq!(tables, vec!["kept".to_string()]);
}

#[tokio::test]
async fn concurrent_creates_of_one_id_share_a_row() {
  let tmp = tempfile::tempdir().unwrap();
  let db = Database::new(config_in(&tmp));
  db.init().await.unwrap().close().await.unwrap();

  let first = db.connect().await.unwrap();
  let second = db.connect().await.unwrap();

  for round in 0..20 {
    let id = format!("{round:03}");
    let (a, b) = tokio::join!(
      first.create(sid(&id), "First".into()),
      second.create(sid(&id), "Second".into()),
    );
    assert_eq!(a.unwrap(), b.unwrap(), "round {round}");
  }

  assert_eq!(row_count(&first).await, 20);
  assert_eq!(second.list_all().await.unwrap().len(), 20);
}

#[tokio::test]
async fn connect_without_schema_fails_on_query() {
  let tmp = tempfile::tempdir().unwrap();
  let cfg = config_in(&tmp);
  std::fs::create_dir_all(&cfg.dir).unwrap();
  let db = Database::new(cfg);

  let conn = db.connect().await.unwrap();
  assert!(matches!(conn.list_all().await, Err(Error::Database(_))));
}
