// ==========================================
// Emergency Device Management System - User repository
// ==========================================
// Role: registered inspector accounts (existence checks + name joins)
// Hard rule: no credentials, no session state
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::UserRole;
use crate::domain::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// UserRepository
// ==========================================
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
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

    /// Insert a user; returns the assigned id
    pub fn insert(
        &self,
        username: &str,
        email: &str,
        role: UserRole,
        default_admin: bool,
    ) -> RepositoryResult<i64> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RepositoryError::ValidationError(
                "username must not be empty".to_string(),
            ));
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO user_account (username, email, role, default_admin)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![username, email, role.to_db_str(), default_admin as i32],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch one user (None when the id is unknown)
    pub fn find_by_id(&self, user_id: i64) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, username, email, role, default_admin
            FROM user_account
            WHERE user_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![user_id], Self::map_row_to_user);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one user by username (seed idempotency, actor resolution)
    pub fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, username, email, role, default_admin
            FROM user_account
            WHERE username = ?1
            "#,
        )?;

        let result = stmt.query_row(params![username.trim()], Self::map_row_to_user);

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn map_row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            user_id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            role: UserRole::from_db_str(&row.get::<_, String>(3)?),
            default_admin: row.get::<_, i32>(4)? != 0,
        })
    }
}
