// ==========================================
// Emergency Device Management System - Inspection repository
// ==========================================
// Role: the append-only inspection log
// Hard rule: INSERT and SELECT only; there is no UPDATE or DELETE here,
// stale submissions are recorded like any other
// ==========================================

use crate::db::{format_timestamp, open_sqlite_connection};
use crate::domain::types::InspectionResult;
use crate::domain::{Inspection, InspectionChecklist, NewInspection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const INSPECTION_SELECT: &str = r#"
    SELECT
        i.inspection_id,
        i.emergency_device_id,
        i.user_id,
        u.username,
        i.inspection_at,
        i.created_at,
        i.inspection_result,
        i.notes,
        i.checklist_json
    FROM emergency_device_inspection i
    JOIN user_account u ON u.user_id = i.user_id
"#;

// ==========================================
// InspectionRepository
// ==========================================
/// Inspection log storage
pub struct InspectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InspectionRepository {
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

    /// Append one inspection; returns the assigned id
    pub fn append(
        &self,
        entry: &NewInspection,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<i64> {
        let checklist_json = serde_json::to_string(&entry.checklist)
            .map_err(|e| RepositoryError::InternalError(format!("checklist encoding failed: {}", e)))?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO emergency_device_inspection (
                emergency_device_id, user_id, inspection_at, created_at,
                inspection_result, notes, checklist_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.emergency_device_id,
                entry.user_id,
                format_timestamp(&entry.inspection_at),
                format_timestamp(&created_at),
                entry.result.to_db_str(),
                entry.notes,
                checklist_json,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch one inspection (None when the id is unknown)
    pub fn find_by_id(&self, inspection_id: i64) -> RepositoryResult<Option<Inspection>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE i.inspection_id = ?1", INSPECTION_SELECT);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![inspection_id], Self::map_row_to_inspection);

        match result {
            Ok(inspection) => Ok(Some(inspection)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Device history, newest event first
    pub fn list_by_device(&self, device_id: i64) -> RepositoryResult<Vec<Inspection>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE i.emergency_device_id = ?1 ORDER BY i.inspection_at DESC, i.inspection_id DESC",
            INSPECTION_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![device_id], Self::map_row_to_inspection)?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    /// Map an INSPECTION_SELECT row
    fn map_row_to_inspection(row: &rusqlite::Row) -> SqliteResult<Inspection> {
        Ok(Inspection {
            inspection_id: row.get(0)?,
            emergency_device_id: row.get(1)?,
            user_id: row.get(2)?,
            inspector_name: row.get(3)?,
            inspection_at: row
                .get::<_, String>(4)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            created_at: row
                .get::<_, String>(5)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_else(|_| Utc::now()),
            result: InspectionResult::from_db_str(&row.get::<_, String>(6)?)
                .unwrap_or(InspectionResult::Failed), // unknown stored value read conservatively
            notes: row.get(7)?,
            checklist: row
                .get::<_, Option<String>>(8)?
                .as_deref()
                .and_then(|s| serde_json::from_str::<InspectionChecklist>(s).ok())
                .unwrap_or_default(),
        })
    }
}
