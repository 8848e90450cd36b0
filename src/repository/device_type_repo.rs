// ==========================================
// Emergency Device Management System - Device type repository
// ==========================================
// Role: the two classification tables (device types, extinguisher types)
// Hard rule: data mapping only, no business logic
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{EmergencyDeviceType, ExtinguisherType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// DeviceTypeRepository
// ==========================================
pub struct DeviceTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DeviceTypeRepository {
    /// Create a repository with its own connection
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

    // ==========================================
    // Emergency device types
    // ==========================================

    /// Insert a device type; returns the assigned id
    pub fn insert_device_type(&self, name: &str) -> RepositoryResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError(
                "emergency_device_type_name must not be empty".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO emergency_device_type (emergency_device_type_name) VALUES (?1)",
            params![name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a device type by its unique name (None when absent)
    pub fn find_device_type_by_name(
        &self,
        name: &str,
    ) -> RepositoryResult<Option<EmergencyDeviceType>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT emergency_device_type_id, emergency_device_type_name
                FROM emergency_device_type
                WHERE emergency_device_type_name = ?1
                "#,
                params![name.trim()],
                |row| {
                    Ok(EmergencyDeviceType {
                        emergency_device_type_id: row.get(0)?,
                        emergency_device_type_name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Whether the device type id exists (registration validation)
    pub fn device_type_exists(&self, device_type_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT emergency_device_type_id FROM emergency_device_type WHERE emergency_device_type_id = ?1",
                params![device_type_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ==========================================
    // Extinguisher types
    // ==========================================

    /// Insert an extinguisher type; returns the assigned id
    pub fn insert_extinguisher_type(&self, name: &str) -> RepositoryResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::ValidationError(
                "extinguisher_type_name must not be empty".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO extinguisher_type (extinguisher_type_name) VALUES (?1)",
            params![name],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch an extinguisher type by its unique name (None when absent)
    pub fn find_extinguisher_type_by_name(
        &self,
        name: &str,
    ) -> RepositoryResult<Option<ExtinguisherType>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT extinguisher_type_id, extinguisher_type_name
                FROM extinguisher_type
                WHERE extinguisher_type_name = ?1
                "#,
                params![name.trim()],
                |row| {
                    Ok(ExtinguisherType {
                        extinguisher_type_id: row.get(0)?,
                        extinguisher_type_name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Whether the extinguisher type id exists (registration validation)
    pub fn extinguisher_type_exists(&self, extinguisher_type_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT extinguisher_type_id FROM extinguisher_type WHERE extinguisher_type_id = ?1",
                params![extinguisher_type_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
