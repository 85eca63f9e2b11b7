// ==========================================
// Pipe Inspection QMS - Application settings
// ==========================================
// Responsibility: resolve the runtime configuration at startup from
// environment variables with sensible fallbacks. The station map is
// parsed once here and injected as an immutable value.
// ==========================================

use std::path::PathBuf;

use anyhow::Context;

use crate::engine::shift::StationMap;

// Environment variable names
pub const ENV_DB_PATH: &str = "PIPE_QMS_DB_PATH";
pub const ENV_SNAPSHOT_DIR: &str = "PIPE_QMS_SNAPSHOT_DIR";
pub const ENV_STATION_MAP: &str = "PIPE_QMS_STATION_MAP";

// ==========================================
// AppSettings
// ==========================================

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// SQLite database file path
    pub db_path: String,

    /// Folder holding the directory snapshot exports
    pub snapshot_dir: PathBuf,

    /// Workstation id -> area/machine mapping
    pub station_map: StationMap,
}

impl AppSettings {
    /// Resolve settings from the environment.
    ///
    /// # Rules
    /// 1. db_path: PIPE_QMS_DB_PATH, else the per-user data directory
    /// 2. snapshot_dir: PIPE_QMS_SNAPSHOT_DIR, else ./snapshots
    /// 3. station_map: JSON file named by PIPE_QMS_STATION_MAP, else
    ///    the built-in Ennis mapping; a malformed file fails startup
    ///    instead of silently misrouting stations
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = get_default_db_path();

        let snapshot_dir = match std::env::var(ENV_SNAPSHOT_DIR) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => PathBuf::from("./snapshots"),
        };

        let station_map = match std::env::var(ENV_STATION_MAP) {
            Ok(path) if !path.trim().is_empty() => load_station_map(path.trim())?,
            _ => StationMap::default_ennis(),
        };

        Ok(AppSettings {
            db_path,
            snapshot_dir,
            station_map,
        })
    }
}

// ==========================================
// Database path resolution
// ==========================================

/// Resolve the database file path.
///
/// # Returns
/// - PIPE_QMS_DB_PATH when set (debugging, tests, CI)
/// - otherwise the per-user data directory, with a dev-suffixed folder
///   in debug builds so development never touches production data
/// - plain ./pipe_inspection_qms.db when no data directory exists
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pipe_inspection_qms.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("pipe-inspection-qms-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("pipe-inspection-qms");
        }

        std::fs::create_dir_all(&path).ok();
        path = path.join("pipe_inspection_qms.db");
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// Helpers
// ==========================================

fn load_station_map(path: &str) -> anyhow::Result<StationMap> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read station map file {}", path))?;
    StationMap::from_json(&raw)
        .with_context(|| format!("failed to parse station map file {}", path))
}
