// ==========================================
// Emergency Device Management System - Action log repository
// ==========================================
// Role: audit trail storage
// Hard rule: append-only; Repository does data mapping, no business logic
// ==========================================

use crate::db::{format_timestamp, open_sqlite_connection};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::types::DeviceStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// ActionLogRepository
// ==========================================
pub struct ActionLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActionLogRepository {
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

    /// Insert one audit entry; returns its action_id
    pub fn insert(&self, log: &ActionLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO action_log (
                action_id, emergency_device_id, inspection_id, action_type,
                action_ts, actor, from_status, to_status, payload_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                log.action_id,
                log.emergency_device_id,
                log.inspection_id,
                log.action_type.to_db_str(),
                format_timestamp(&log.action_ts),
                log.actor,
                log.from_status.map(|s| s.to_db_str()),
                log.to_status.map(|s| s.to_db_str()),
                log.payload_json.as_ref().map(|v| v.to_string()),
            ],
        )?;

        Ok(log.action_id.clone())
    }

    /// Audit history for one device, newest first; insertion order breaks
    /// ties between entries logged in the same instant
    pub fn list_by_device(&self, device_id: i64) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, emergency_device_id, inspection_id, action_type,
                   action_ts, actor, from_status, to_status, payload_json
            FROM action_log
            WHERE emergency_device_id = ?1
            ORDER BY action_ts DESC, rowid DESC
            "#,
        )?;

        let logs = stmt
            .query_map(params![device_id], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    fn map_row(row: &rusqlite::Row) -> SqliteResult<ActionLog> {
        Ok(ActionLog {
            action_id: row.get(0)?,
            emergency_device_id: row.get(1)?,
            inspection_id: row.get(2)?,
            action_type: ActionType::from_db_str(&row.get::<_, String>(3)?)
                .unwrap_or(ActionType::InspectionStale), // unknown read conservatively
            action_ts: row
                .get::<_, String>(4)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            actor: row.get(5)?,
            from_status: row
                .get::<_, Option<String>>(6)?
                .as_deref()
                .and_then(DeviceStatus::from_db_str),
            to_status: row
                .get::<_, Option<String>>(7)?
                .as_deref()
                .and_then(DeviceStatus::from_db_str),
            payload_json: row
                .get::<_, Option<String>>(8)?
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
        })
    }
}
