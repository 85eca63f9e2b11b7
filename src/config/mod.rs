// ==========================================
// Pipe Inspection QMS - Configuration layer
// ==========================================
// Responsibility: startup configuration from the environment
// (database path, snapshot folder, station map override).
// ==========================================

pub mod settings;

pub use settings::{get_default_db_path, AppSettings};
pub use settings::{ENV_DB_PATH, ENV_SNAPSHOT_DIR, ENV_STATION_MAP};
