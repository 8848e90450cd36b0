// ==========================================
// Emergency Device Management System - Device repository
// ==========================================
// Role: emergency_device table access, including the guarded status write
// Hard rule: status + last_inspection_at change together or not at all;
// the newest-wins guard is part of the UPDATE statement itself
// ==========================================

use crate::db::{format_date, format_timestamp, open_sqlite_connection, parse_date, parse_timestamp};
use crate::domain::types::DeviceStatus;
use crate::domain::{EmergencyDevice, NewDevice};
use crate::repository::contracts::{ConditionalUpdate, DeviceStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, ToSql};
use std::sync::{Arc, Mutex};

/// Optional list filters (site, then building within the site)
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    pub site_id: Option<i64>,
    pub building_code: Option<String>,
}

const DEVICE_SELECT: &str = r#"
    SELECT
        d.emergency_device_id,
        d.emergency_device_type_id,
        dt.emergency_device_type_name,
        d.extinguisher_type_id,
        et.extinguisher_type_name,
        d.room_id,
        r.room_code,
        b.building_id,
        b.building_code,
        s.site_id,
        s.site_name,
        d.serial_number,
        d.manufacture_date,
        d.last_inspection_at,
        d.description,
        d.size,
        d.status
    FROM emergency_device d
    JOIN emergency_device_type dt
        ON dt.emergency_device_type_id = d.emergency_device_type_id
    LEFT JOIN extinguisher_type et
        ON et.extinguisher_type_id = d.extinguisher_type_id
    JOIN room r ON r.room_id = d.room_id
    JOIN building b ON b.building_id = r.building_id
    JOIN site s ON s.site_id = b.site_id
"#;

// ==========================================
// DeviceRepository
// ==========================================
/// Device storage
/// Role: emergency_device rows plus the joined type/location names
pub struct DeviceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeviceRepository {
    /// Create a repository with its own connection
    ///
    /// # Arguments
    /// - db_path: database file path
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a repository over a shared connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a device; returns the assigned id
    ///
    /// Foreign keys to room and type tables are enforced by the schema;
    /// content rules (lengths, date ordering) belong to the device api.
    pub fn insert(&self, device: &NewDevice) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO emergency_device (
                emergency_device_type_id, extinguisher_type_id, room_id,
                serial_number, manufacture_date, last_inspection_at,
                description, size, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                device.emergency_device_type_id,
                device.extinguisher_type_id,
                device.room_id,
                device.serial_number,
                device.manufacture_date.as_ref().map(format_date),
                device.last_inspection_at.as_ref().map(format_timestamp),
                device.description,
                device.size,
                device.status.map(|s| s.to_db_str()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch one device with joined names (None when the id is unknown)
    pub fn find_by_id(&self, device_id: i64) -> RepositoryResult<Option<EmergencyDevice>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE d.emergency_device_id = ?1", DEVICE_SELECT);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![device_id], Self::map_row_to_device);

        match result {
            Ok(device) => Ok(Some(device)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List devices, optionally narrowed to a site / building code
    pub fn list(&self, filter: &DeviceFilter) -> RepositoryResult<Vec<EmergencyDevice>> {
        let conn = self.get_conn()?;

        let mut sql = String::from(DEVICE_SELECT);
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(site_id) = filter.site_id {
            clauses.push(format!("s.site_id = ?{}", args.len() + 1));
            args.push(Box::new(site_id));
        }
        if let Some(code) = &filter.building_code {
            let code = code.trim();
            if !code.is_empty() {
                clauses.push(format!("b.building_code = ?{}", args.len() + 1));
                args.push(Box::new(code.to_string()));
            }
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY d.emergency_device_id");

        let mut stmt = conn.prepare(&sql)?;
        let params_vec: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let rows = stmt.query_map(params_vec.as_slice(), Self::map_row_to_device)?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    /// Per-status device counts (raw stored strings; NULL counted as "(none)")
    pub fn count_by_status(&self) -> RepositoryResult<Vec<(String, i64)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT COALESCE(status, '(none)') AS status, COUNT(*)
            FROM emergency_device
            GROUP BY COALESCE(status, '(none)')
            ORDER BY status
            "#,
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    /// Guarded status write (see `DeviceStore::update_status_if_newer`)
    ///
    /// # Concurrency
    /// The newest-wins check rides inside the UPDATE's WHERE clause, so two
    /// racing submissions serialize on the database and exactly one wins.
    ///
    /// # Errors
    /// - `RepositoryError::NotFound`: device id does not exist
    pub fn update_status_if_newer(
        &self,
        device_id: i64,
        new_status: DeviceStatus,
        inspection_at: DateTime<Utc>,
    ) -> RepositoryResult<ConditionalUpdate> {
        let conn = self.get_conn()?;
        let ts = format_timestamp(&inspection_at);

        let rows_affected = conn.execute(
            r#"UPDATE emergency_device
               SET status = ?1, last_inspection_at = ?2
               WHERE emergency_device_id = ?3
                 AND (last_inspection_at IS NULL OR last_inspection_at < ?2)"#,
            params![new_status.to_db_str(), ts, device_id],
        )?;

        if rows_affected == 0 {
            // Missing row or a newer-or-equal stored timestamp?
            let exists: Result<i64, _> = conn.query_row(
                "SELECT emergency_device_id FROM emergency_device WHERE emergency_device_id = ?1",
                params![device_id],
                |row| row.get(0),
            );

            return match exists {
                Ok(_) => Ok(ConditionalUpdate::Stale),
                Err(rusqlite::Error::QueryReturnedNoRows) => Err(RepositoryError::NotFound {
                    entity: "EmergencyDevice".to_string(),
                    id: device_id.to_string(),
                }),
                Err(e) => Err(e.into()),
            };
        }

        Ok(ConditionalUpdate::Applied)
    }

    /// Map a DEVICE_SELECT row
    fn map_row_to_device(row: &rusqlite::Row) -> SqliteResult<EmergencyDevice> {
        Ok(EmergencyDevice {
            emergency_device_id: row.get(0)?,
            emergency_device_type_id: row.get(1)?,
            emergency_device_type_name: row.get(2)?,
            extinguisher_type_id: row.get(3)?,
            extinguisher_type_name: row.get(4)?,
            room_id: row.get(5)?,
            room_code: row.get(6)?,
            building_id: row.get(7)?,
            building_code: row.get(8)?,
            site_id: row.get(9)?,
            site_name: row.get(10)?,
            serial_number: row.get(11)?,
            manufacture_date: row
                .get::<_, Option<String>>(12)?
                .as_deref()
                .and_then(parse_date),
            last_inspection_at: row
                .get::<_, Option<String>>(13)?
                .as_deref()
                .and_then(parse_timestamp),
            description: row.get(14)?,
            size: row.get(15)?,
            status: row
                .get::<_, Option<String>>(16)?
                .as_deref()
                .and_then(DeviceStatus::from_db_str),
        })
    }
}

#[async_trait]
impl DeviceStore for DeviceRepository {
    async fn update_status_if_newer(
        &self,
        device_id: i64,
        new_status: DeviceStatus,
        inspection_at: DateTime<Utc>,
    ) -> RepositoryResult<ConditionalUpdate> {
        DeviceRepository::update_status_if_newer(self, device_id, new_status, inspection_at)
    }
}
