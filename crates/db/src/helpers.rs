use rusqlite::Row;
use snus_core::Entry;

pub(crate) const ENTRY_COLUMNS: &str = "id, timestamp, latitude, longitude";

pub(crate) fn row_to_entry(row: &Row<'_>) -> std::result::Result<Entry, rusqlite::Error> {
    Ok(Entry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
    })
}
