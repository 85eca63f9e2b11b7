// ==========================================
// Pipe Inspection QMS - Main entry
// ==========================================
// Stack: Rust + SQLite + directory snapshots
// Opens the database, wires the app state, preloads the directory
// and reports readiness.
// ==========================================

use pipe_inspection_qms::app::AppState;
use pipe_inspection_qms::config::AppSettings;
use pipe_inspection_qms::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", pipe_inspection_qms::APP_NAME);
    tracing::info!("version: {}", pipe_inspection_qms::VERSION);
    tracing::info!("==================================================");

    let settings = AppSettings::from_env()?;
    tracing::info!(db_path = %settings.db_path, "using database");
    tracing::info!(snapshot_dir = %settings.snapshot_dir.display(), "using snapshot folder");

    let state = AppState::new(settings)?;

    // Fail fast on unreadable snapshots instead of at the first login.
    let summary = state.directory.preload().await?;

    let health = state.session_api.health();
    tracing::info!(
        status = %health.status,
        version = %health.version,
        employees = summary.employees,
        work_orders = summary.work_orders,
        recipes = summary.recipes,
        "ready"
    );

    Ok(())
}
