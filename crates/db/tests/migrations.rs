use rusqlite::Connection;

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("twice.sqlite");
    let mut db = snus_db::Db::open(&db_path).expect("open db");
    db.migrate().expect("first migrate");
    let id = db
        .insert_entry(&snus_core::Entry::new(1_000))
        .expect("insert");
    db.migrate().expect("second migrate");
    assert_eq!(db.get_entry(id).expect("get").map(|entry| entry.timestamp), Some(1_000));
}

#[test]
fn migrate_creates_entry_table_and_timestamp_index() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("fresh.sqlite");
    let mut db = snus_db::Db::open(&db_path).expect("open db");
    db.migrate().expect("migrate db");

    let conn = Connection::open(&db_path).expect("open conn");
    let mut stmt = conn
        .prepare("PRAGMA table_info(snus_entry)")
        .expect("table info");
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .expect("columns")
        .collect::<Result<Vec<_>, _>>()
        .expect("column names");
    assert_eq!(columns, vec!["id", "timestamp", "latitude", "longitude"]);

    let index_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_snus_entry_timestamp'",
            [],
            |row| row.get(0),
        )
        .expect("index lookup");
    assert_eq!(index_count, 1);
}
