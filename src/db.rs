// ==========================================
// Emergency Device Management System - SQLite bootstrap
// ==========================================
// Goals:
// - One place for Connection::open PRAGMA behavior, so every module gets
//   foreign keys and the same busy_timeout instead of a per-module mix
// - One place for the schema DDL and the expected schema_version
// - One canonical text format for stored dates and timestamps; the
//   conditional status update compares timestamp columns with SQL `<`,
//   which is only correct while every writer uses the same fixed-width
//   encoding
// ==========================================

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version the code expects (bumped together with `init_schema`)
///
/// Used as a startup warning gate only; there is no automatic migration.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the shared PRAGMA set to a connection
///
/// Notes:
/// - foreign_keys must be enabled per connection
/// - busy_timeout must be configured per connection
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the shared configuration applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Read schema_version (None when the table does not exist yet)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

// ==========================================
// Schema
// ==========================================

/// Create all tables and indexes (idempotent)
///
/// Called by the binary on startup, by the demo seeder and by the test
/// helpers, so the DDL lives here exactly once.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS site (
            site_id INTEGER PRIMARY KEY AUTOINCREMENT,
            site_name TEXT NOT NULL UNIQUE,
            site_address TEXT NOT NULL,
            site_map_image_path TEXT
        );

        CREATE TABLE IF NOT EXISTS building (
            building_id INTEGER PRIMARY KEY AUTOINCREMENT,
            site_id INTEGER NOT NULL REFERENCES site(site_id),
            building_code TEXT NOT NULL,
            UNIQUE (site_id, building_code)
        );

        CREATE TABLE IF NOT EXISTS room (
            room_id INTEGER PRIMARY KEY AUTOINCREMENT,
            building_id INTEGER NOT NULL REFERENCES building(building_id),
            room_code TEXT NOT NULL,
            UNIQUE (building_id, room_code)
        );

        CREATE TABLE IF NOT EXISTS emergency_device_type (
            emergency_device_type_id INTEGER PRIMARY KEY AUTOINCREMENT,
            emergency_device_type_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS extinguisher_type (
            extinguisher_type_id INTEGER PRIMARY KEY AUTOINCREMENT,
            extinguisher_type_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS user_account (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'User',
            default_admin INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS emergency_device (
            emergency_device_id INTEGER PRIMARY KEY AUTOINCREMENT,
            emergency_device_type_id INTEGER NOT NULL
                REFERENCES emergency_device_type(emergency_device_type_id),
            extinguisher_type_id INTEGER
                REFERENCES extinguisher_type(extinguisher_type_id),
            room_id INTEGER NOT NULL REFERENCES room(room_id),
            serial_number TEXT UNIQUE,
            manufacture_date TEXT,
            last_inspection_at TEXT,
            description TEXT,
            size TEXT,
            status TEXT
        );

        CREATE TABLE IF NOT EXISTS emergency_device_inspection (
            inspection_id INTEGER PRIMARY KEY AUTOINCREMENT,
            emergency_device_id INTEGER NOT NULL
                REFERENCES emergency_device(emergency_device_id),
            user_id INTEGER NOT NULL REFERENCES user_account(user_id),
            inspection_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            inspection_result TEXT NOT NULL,
            notes TEXT,
            checklist_json TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_inspection_device_ts
            ON emergency_device_inspection (emergency_device_id, inspection_at DESC);

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            emergency_device_id INTEGER NOT NULL,
            inspection_id INTEGER,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            from_status TEXT,
            to_status TEXT,
            payload_json TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_action_log_device
            ON action_log (emergency_device_id, action_ts DESC);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![CURRENT_SCHEMA_VERSION, format_timestamp(&Utc::now())],
    )?;

    Ok(())
}

// ==========================================
// Stored text formats
// ==========================================
// Timestamps: fixed-width microsecond UTC, e.g. 2024-09-01T07:30:00.000000Z.
// Fixed width keeps lexicographic order equal to chronological order, which
// the newest-wins UPDATE guard relies on. Dates: plain %Y-%m-%d.

/// Encode a timestamp for storage
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp (None when the text is not valid RFC 3339)
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Encode a calendar date for storage
pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Decode a stored calendar date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_round_trip_is_fixed_width() {
        let ts = Utc.with_ymd_and_hms(2024, 9, 1, 7, 30, 0).unwrap();
        let encoded = format_timestamp(&ts);
        assert_eq!(encoded, "2024-09-01T07:30:00.000000Z");
        assert_eq!(parse_timestamp(&encoded), Some(ts));
    }

    #[test]
    fn test_timestamp_text_order_matches_chronology() {
        let earlier = Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }
}
