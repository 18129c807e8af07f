use chrono::{DateTime, TimeZone};
use rusqlite::{OptionalExtension, params};
use snus_core::{Entry, TimeWindow, WindowBounds};
use tracing::debug;

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{ENTRY_COLUMNS, row_to_entry};

impl Db {
    /// Persists `entry` under a freshly assigned id. Any id on `entry` is ignored.
    pub fn insert_entry(&self, entry: &Entry) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO snus_entry (timestamp, latitude, longitude)
            VALUES (?1, ?2, ?3)
            "#,
            params![entry.timestamp, entry.latitude, entry.longitude],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, timestamp = entry.timestamp, "inserted entry");
        Ok(id)
    }

    /// Returns `false` when no entry had this id; that is not an error.
    pub fn delete_entry(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM snus_entry WHERE id = ?1", params![id])?;
        debug!(id, removed, "deleted entry");
        Ok(removed > 0)
    }

    pub fn get_entry(&self, id: i64) -> Result<Option<Entry>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM snus_entry WHERE id = ?1", ENTRY_COLUMNS),
                params![id],
                row_to_entry,
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn all_entries(&self) -> Result<Vec<Entry>> {
        self.entries_in(&WindowBounds::UNBOUNDED)
    }

    /// Entries with `start <= timestamp < end`, newest first.
    pub fn entries_between(&self, start: i64, end: i64) -> Result<Vec<Entry>> {
        self.entries_in(&WindowBounds::between(start, end))
    }

    pub fn entries_in(&self, bounds: &WindowBounds) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM snus_entry
            WHERE (?1 IS NULL OR timestamp >= ?1)
              AND (?2 IS NULL OR timestamp < ?2)
            ORDER BY timestamp DESC, id DESC
            "#,
            ENTRY_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![bounds.start, bounds.end], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn entries_for_window<Tz: TimeZone>(
        &self,
        window: TimeWindow,
        now: &DateTime<Tz>,
    ) -> Result<Vec<Entry>> {
        self.entries_in(&WindowBounds::resolve(window, now))
    }

    pub fn entry_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM snus_entry", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn latest_entry_in(&self, bounds: &WindowBounds) -> Result<Option<Entry>> {
        self.conn
            .query_row(
                &format!(
                    r#"
                    SELECT {}
                    FROM snus_entry
                    WHERE (?1 IS NULL OR timestamp >= ?1)
                      AND (?2 IS NULL OR timestamp < ?2)
                    ORDER BY timestamp DESC, id DESC
                    LIMIT 1
                    "#,
                    ENTRY_COLUMNS
                ),
                params![bounds.start, bounds.end],
                row_to_entry,
            )
            .optional()
            .map_err(DbError::from)
    }
}
