// ==========================================
// Emergency Device Management - Service entry
// ==========================================
// Stack: Rust + SQLite
// Role: bootstrap the compliance core and report the device census
// ==========================================

use edms_core::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    edms_core::logging::init();

    tracing::info!("==================================================");
    tracing::info!("Emergency Device Management - compliance core");
    tracing::info!("version: {}", edms_core::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("using database: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow::anyhow!(e))?;

    // Startup census over stored statuses; derived overlays are
    // read-side only and never show up here
    let census = state.device_api.device_census()?;
    if census.is_empty() {
        tracing::info!("device census: no devices registered");
    } else {
        for (status, count) in &census {
            tracing::info!("device census: status={}, count={}", status, count);
        }
    }

    Ok(())
}
