// ==========================================
// Emergency Device Management System - Location repository
// ==========================================
// Role: the site -> building -> room hierarchy
// Hard rule: data mapping only, no business logic
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{Building, Room, Site};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// LocationRepository
// ==========================================
pub struct LocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LocationRepository {
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
    // Sites
    // ==========================================

    /// Insert a site; returns the assigned id
    pub fn insert_site(
        &self,
        site_name: &str,
        site_address: &str,
        site_map_image_path: Option<&str>,
    ) -> RepositoryResult<i64> {
        let site_name = site_name.trim();
        if site_name.is_empty() {
            return Err(RepositoryError::ValidationError(
                "site_name must not be empty".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO site (site_name, site_address, site_map_image_path) VALUES (?1, ?2, ?3)",
            params![site_name, site_address, site_map_image_path],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a site by its unique name (None when absent)
    pub fn find_site_by_name(&self, site_name: &str) -> RepositoryResult<Option<Site>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT site_id, site_name, site_address, site_map_image_path
                FROM site
                WHERE site_name = ?1
                "#,
                params![site_name.trim()],
                |row| {
                    Ok(Site {
                        site_id: row.get(0)?,
                        site_name: row.get(1)?,
                        site_address: row.get(2)?,
                        site_map_image_path: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// All sites, by name
    pub fn list_sites(&self) -> RepositoryResult<Vec<Site>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT site_id, site_name, site_address, site_map_image_path FROM site ORDER BY site_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Site {
                site_id: row.get(0)?,
                site_name: row.get(1)?,
                site_address: row.get(2)?,
                site_map_image_path: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    // ==========================================
    // Buildings
    // ==========================================

    /// Insert a building; returns the assigned id
    pub fn insert_building(&self, site_id: i64, building_code: &str) -> RepositoryResult<i64> {
        let building_code = building_code.trim();
        if building_code.is_empty() {
            return Err(RepositoryError::ValidationError(
                "building_code must not be empty".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO building (site_id, building_code) VALUES (?1, ?2)",
            params![site_id, building_code],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a building by (site, code) (None when absent)
    pub fn find_building(
        &self,
        site_id: i64,
        building_code: &str,
    ) -> RepositoryResult<Option<Building>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT building_id, site_id, building_code
                FROM building
                WHERE site_id = ?1 AND building_code = ?2
                "#,
                params![site_id, building_code.trim()],
                |row| {
                    Ok(Building {
                        building_id: row.get(0)?,
                        site_id: row.get(1)?,
                        building_code: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    // ==========================================
    // Rooms
    // ==========================================

    /// Insert a room; returns the assigned id
    pub fn insert_room(&self, building_id: i64, room_code: &str) -> RepositoryResult<i64> {
        let room_code = room_code.trim();
        if room_code.is_empty() {
            return Err(RepositoryError::ValidationError(
                "room_code must not be empty".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO room (building_id, room_code) VALUES (?1, ?2)",
            params![building_id, room_code],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch a room by (building, code) (None when absent)
    pub fn find_room(&self, building_id: i64, room_code: &str) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT room_id, building_id, room_code
                FROM room
                WHERE building_id = ?1 AND room_code = ?2
                "#,
                params![building_id, room_code.trim()],
                |row| {
                    Ok(Room {
                        room_id: row.get(0)?,
                        building_id: row.get(1)?,
                        room_code: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(result)
    }

    /// Whether the room id exists (registration validation)
    pub fn room_exists(&self, room_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT room_id FROM room WHERE room_id = ?1",
                params![room_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
