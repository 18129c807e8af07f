#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use snus_core::Entry;
use snus_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn ts(value: &str) -> i64 {
    DateTime::parse_from_rfc3339(value)
        .expect("timestamp")
        .timestamp_millis()
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn make_entry(timestamp: i64, latitude: f64, longitude: f64) -> Entry {
    Entry {
        id: 0,
        timestamp,
        latitude,
        longitude,
    }
}

pub fn insert_at(db: &Db, timestamps: &[i64]) -> Vec<i64> {
    timestamps
        .iter()
        .map(|timestamp| db.insert_entry(&Entry::new(*timestamp)).expect("insert entry"))
        .collect()
}
