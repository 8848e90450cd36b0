// ==========================================
// Emergency Device Management - Application state
// ==========================================
// Role: owns the shared connection and wires repositories,
// engines and APIs together
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{DeviceApi, InspectionApi};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::types::UserRole;
use crate::engine::StatusTransitionEngine;
use crate::repository::{
    ActionLogRepository, Clock, DeviceRepository, DeviceTypeRepository, InspectionRepository,
    LocationRepository, SystemClock, UserRepository,
};

/// Username created on first start so submissions have a known actor.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

// ==========================================
// AppState
// ==========================================

/// Application state
///
/// Holds the API instances an outer surface calls. All of them share
/// one SQLite connection behind a mutex.
pub struct AppState {
    /// Database file path
    pub db_path: String,

    /// Device registration and views
    pub device_api: Arc<DeviceApi>,

    /// Inspection submission and history
    pub inspection_api: Arc<InspectionApi>,
}

impl AppState {
    /// Create a new AppState.
    ///
    /// # Arguments
    /// - db_path: database file path (created on first start)
    ///
    /// # Returns
    /// - Ok(AppState): ready-to-use application state
    /// - Err(String): initialization error
    ///
    /// # Notes
    /// Opens the shared connection, applies the schema, then builds
    /// repositories, engines and APIs in that order.
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("initializing application state: db_path={}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database: {}", e))?;
        init_schema(&conn).map_err(|e| format!("cannot apply schema: {}", e))?;
        match read_schema_version(&conn) {
            Ok(Some(version)) if version != CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "schema version mismatch: found={}, expected={}",
                    version,
                    CURRENT_SCHEMA_VERSION
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("schema version could not be read: {}", e);
            }
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repository layer
        // ==========================================
        let device_repo = Arc::new(DeviceRepository::from_connection(conn.clone()));
        let user_repo = Arc::new(UserRepository::from_connection(conn.clone()));
        let inspection_repo = Arc::new(InspectionRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::from_connection(conn.clone()));
        let location_repo = Arc::new(LocationRepository::from_connection(conn.clone()));
        let device_type_repo = Arc::new(DeviceTypeRepository::from_connection(conn.clone()));

        // First-start bootstrap; a failure here should not block startup
        if let Err(e) = ensure_default_admin(&user_repo) {
            tracing::warn!("default admin bootstrap failed: {}", e);
        }

        // ==========================================
        // Engine layer
        // ==========================================
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let transition_engine = Arc::new(StatusTransitionEngine::new(device_repo.clone()));

        // ==========================================
        // API layer
        // ==========================================
        let inspection_api = Arc::new(InspectionApi::new(
            device_repo.clone(),
            user_repo.clone(),
            inspection_repo,
            action_log_repo.clone(),
            transition_engine,
            clock.clone(),
        ));
        let device_api = Arc::new(DeviceApi::new(
            device_repo,
            location_repo,
            device_type_repo,
            action_log_repo,
            clock,
        ));

        tracing::info!("application state ready");

        Ok(Self {
            db_path,
            device_api,
            inspection_api,
        })
    }
}

/// Create the default admin account when no account carries the
/// default-admin flag yet. Idempotent across restarts.
fn ensure_default_admin(user_repo: &UserRepository) -> Result<(), String> {
    let existing = user_repo
        .find_by_username(DEFAULT_ADMIN_USERNAME)
        .map_err(|e| format!("admin lookup failed: {}", e))?;
    if existing.is_some() {
        return Ok(());
    }
    let user_id = user_repo
        .insert(DEFAULT_ADMIN_USERNAME, "admin@localhost", UserRole::Admin, true)
        .map_err(|e| format!("admin creation failed: {}", e))?;
    tracing::info!("default admin created: user_id={}", user_id);
    Ok(())
}

// ==========================================
// Default database path
// ==========================================

/// Resolve the database path.
///
/// Order: `EDMS_DB_PATH` environment variable, then the platform data
/// directory, then the working directory as a last resort.
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("EDMS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./edms.db");

    if let Some(data_dir) = dirs::data_dir() {
        // Development builds keep their own directory so they never
        // touch production data
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("edms-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("edms");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("edms.db");
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// Tests
// ==========================================
