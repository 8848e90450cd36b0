// ==========================================
// Emergency Device Management - Application layer
// ==========================================
// Role: process-level wiring and startup
// ==========================================

pub mod state;

// Re-export
pub use state::{get_default_db_path, AppState, DEFAULT_ADMIN_USERNAME};
