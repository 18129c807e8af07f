mod support;

use snus_core::{Entry, TimeWindow, WindowBounds};
use support::{fixed_now, insert_at, make_entry, setup_db, ts};

#[test]
fn insert_assigns_fresh_ids_and_round_trips() {
    let test_db = setup_db();
    let db = &test_db.db;

    let mut entry = make_entry(ts("2025-06-15T11:00:00Z"), 59.3293, 18.0686);
    entry.id = 999;
    let id = db.insert_entry(&entry).expect("insert");
    assert_ne!(id, 999);

    let all = db.all_entries().expect("all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, id);
    assert_eq!(all[0].timestamp, entry.timestamp);
    assert_eq!(all[0].latitude, 59.3293);
    assert_eq!(all[0].longitude, 18.0686);

    let second = db
        .insert_entry(&Entry::new(ts("2025-06-15T11:30:00Z")))
        .expect("insert second");
    assert_ne!(second, id);
    assert_eq!(db.entry_count().expect("count"), 2);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let test_db = setup_db();
    let db = &test_db.db;
    let ids = insert_at(db, &[1_000, 2_000]);
    assert!(db.delete_entry(ids[1]).expect("delete"));
    let next = db.insert_entry(&Entry::new(3_000)).expect("insert");
    assert!(next > ids[1]);
}

#[test]
fn all_entries_are_newest_first() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_at(
        db,
        &[
            ts("2025-06-14T08:00:00Z"),
            ts("2025-06-15T09:00:00Z"),
            ts("2025-06-13T10:00:00Z"),
        ],
    );
    let timestamps: Vec<i64> = db
        .all_entries()
        .expect("all")
        .into_iter()
        .map(|entry| entry.timestamp)
        .collect();
    assert_eq!(
        timestamps,
        vec![
            ts("2025-06-15T09:00:00Z"),
            ts("2025-06-14T08:00:00Z"),
            ts("2025-06-13T10:00:00Z"),
        ]
    );
}

#[test]
fn delete_removes_from_all_and_window_queries() {
    let test_db = setup_db();
    let db = &test_db.db;
    let now = fixed_now();
    let ids = insert_at(db, &[ts("2025-06-15T10:00:00Z"), ts("2025-06-15T11:00:00Z")]);

    let today = db
        .entries_for_window(TimeWindow::Daily, &now)
        .expect("today");
    assert_eq!(today.len(), 2);

    assert!(db.delete_entry(ids[0]).expect("delete"));
    let all = db.all_entries().expect("all");
    assert!(all.iter().all(|entry| entry.id != ids[0]));
    let today = db
        .entries_for_window(TimeWindow::Daily, &now)
        .expect("today");
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].id, ids[1]);
    assert!(db.get_entry(ids[0]).expect("get").is_none());
}

#[test]
fn deleting_missing_id_is_not_an_error() {
    let test_db = setup_db();
    let db = &test_db.db;
    let ids = insert_at(db, &[1_000]);
    assert!(db.delete_entry(ids[0]).expect("delete"));
    assert!(!db.delete_entry(ids[0]).expect("delete again"));
    assert!(!db.delete_entry(12_345).expect("delete unknown"));
}

#[test]
fn today_excludes_previous_day_and_includes_recent() {
    let test_db = setup_db();
    let db = &test_db.db;
    let now = fixed_now();
    let now_ms = now.timestamp_millis();
    let ids = insert_at(db, &[now_ms - 25 * 3_600_000, now_ms - 60_000]);

    let today = db
        .entries_for_window(TimeWindow::Daily, &now)
        .expect("today");
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].id, ids[1]);
}

#[test]
fn window_queries_follow_calendar_bounds() {
    let test_db = setup_db();
    let db = &test_db.db;
    let now = fixed_now();
    insert_at(
        db,
        &[
            ts("2024-12-31T23:59:59Z"),
            ts("2025-01-01T00:00:00Z"),
            ts("2025-05-31T23:00:00Z"),
            ts("2025-06-01T00:00:00Z"),
            ts("2025-06-08T23:59:59Z"),
            ts("2025-06-09T00:00:00Z"),
            ts("2025-06-15T11:59:00Z"),
        ],
    );

    let week = db.entries_for_window(TimeWindow::Weekly, &now).expect("week");
    assert_eq!(week.len(), 2);
    let month = db
        .entries_for_window(TimeWindow::Monthly, &now)
        .expect("month");
    assert_eq!(month.len(), 4);
    let year = db.entries_for_window(TimeWindow::Yearly, &now).expect("year");
    assert_eq!(year.len(), 6);
    let total = db.entries_for_window(TimeWindow::Total, &now).expect("total");
    assert_eq!(total.len(), 7);
}

#[test]
fn entries_between_is_half_open() {
    let test_db = setup_db();
    let db = &test_db.db;
    insert_at(db, &[100, 200, 300]);
    let entries = db.entries_between(100, 300).expect("range");
    let timestamps: Vec<i64> = entries.iter().map(|entry| entry.timestamp).collect();
    assert_eq!(timestamps, vec![200, 100]);
}

#[test]
fn latest_entry_in_bounds() {
    let test_db = setup_db();
    let db = &test_db.db;
    let ids = insert_at(db, &[100, 300, 200]);
    let latest = db
        .latest_entry_in(&WindowBounds::between(0, 1_000))
        .expect("latest")
        .expect("some entry");
    assert_eq!(latest.id, ids[1]);
    assert!(
        db.latest_entry_in(&WindowBounds::between(1_000, 2_000))
            .expect("latest")
            .is_none()
    );
}
