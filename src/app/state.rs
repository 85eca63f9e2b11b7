// ==========================================
// Pipe Inspection QMS - Application state
// ==========================================
// Responsibility: open the database, bootstrap the schema, and wire
// repositories, directory, resolver and APIs over one shared
// connection.
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;

use crate::api::{InspectionApi, NcrApi, SessionApi};
use crate::config::AppSettings;
use crate::db::{open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::directory::SnapshotDirectory;
use crate::engine::shift::ShiftResolver;
use crate::repository::{InspectionRepository, NcrRepository};

/// Application state
///
/// Holds the API instances and shared resources the binaries use.
pub struct AppState {
    /// Database file path
    pub db_path: String,

    /// Login and directory-read API
    pub session_api: Arc<SessionApi<SnapshotDirectory>>,

    /// Submission and listing API
    pub inspection_api: Arc<InspectionApi<SnapshotDirectory>>,

    /// NCR listing and sync API
    pub ncr_api: Arc<NcrApi>,

    /// Snapshot directory (exposed for the startup preload)
    pub directory: Arc<SnapshotDirectory>,
}

impl AppState {
    /// Build the application state.
    ///
    /// # Steps
    /// 1. Open the database and bootstrap the schema
    /// 2. Locate the directory snapshot files
    /// 3. Wire repositories and APIs over the shared connection
    pub fn new(settings: AppSettings) -> anyhow::Result<Self> {
        tracing::info!(db_path = %settings.db_path, "initializing application state");

        let conn = open_sqlite_connection(&settings.db_path)
            .with_context(|| format!("failed to open database {}", settings.db_path))?;
        ensure_inspection_schema(&conn).context("failed to bootstrap inspection schema")?;

        // Warn only; no automatic migration.
        match read_schema_version(&conn) {
            Ok(Some(version)) if version != CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    stored = version,
                    expected = CURRENT_SCHEMA_VERSION,
                    "schema version mismatch"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("schema version check failed: {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // Repository layer
        // ==========================================
        let inspection_repo = Arc::new(InspectionRepository::from_connection(conn.clone()));
        let ncr_repo = Arc::new(NcrRepository::from_connection(conn));

        // ==========================================
        // Directory and resolver
        // ==========================================
        let directory = Arc::new(
            SnapshotDirectory::locate(&settings.snapshot_dir).with_context(|| {
                format!(
                    "failed to locate directory snapshots in {}",
                    settings.snapshot_dir.display()
                )
            })?,
        );
        let shift_resolver = Arc::new(ShiftResolver::new(settings.station_map));

        // ==========================================
        // API layer
        // ==========================================
        let session_api = Arc::new(SessionApi::new(directory.clone(), shift_resolver.clone()));
        let inspection_api = Arc::new(InspectionApi::new(
            inspection_repo,
            directory.clone(),
            shift_resolver,
        ));
        let ncr_api = Arc::new(NcrApi::new(ncr_repo));

        tracing::info!("application state initialized");

        Ok(Self {
            db_path: settings.db_path,
            session_api,
            inspection_api,
            ncr_api,
            directory,
        })
    }

    /// Database file path
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// Schema bootstrap
// ==========================================

/// Create the inspection tables and indexes if they do not exist.
///
/// Idempotent; safe to run at every startup. The partial unique index
/// keys the open statuses into (work_order, connection, pipe_number,
/// status): rounds escalate through distinct statuses, so a legitimate
/// re-inspection inserts freely while two racing submissions landing on
/// the same stage collide instead of duplicating a round.
pub fn ensure_inspection_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS inspection_record (
          record_id TEXT PRIMARY KEY,
          work_order TEXT NOT NULL,
          connection TEXT NOT NULL,
          pipe_number INTEGER NOT NULL,
          round INTEGER NOT NULL,
          status TEXT NOT NULL CHECK(status IN (
            'FIRST_INSPECTION', 'SECOND_INSPECTION', 'THIRD_INSPECTION',
            'COMPLETED', 'SCRAPPED')),
          inspector_adp TEXT NOT NULL,
          inspector_name TEXT NOT NULL,
          operator_name TEXT NOT NULL,
          area TEXT NOT NULL,
          machine_number TEXT NOT NULL,
          shift TEXT NOT NULL CHECK(shift IN ('DAY', 'NIGHT')),
          fai_number TEXT NOT NULL,
          drawing_number TEXT NOT NULL,
          measurements_json TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        -- one open record per pipe and stage; racing submissions collide here
        CREATE UNIQUE INDEX IF NOT EXISTS ux_inspection_open
          ON inspection_record(work_order, connection, pipe_number, status)
          WHERE status IN ('FIRST_INSPECTION', 'SECOND_INSPECTION', 'THIRD_INSPECTION');

        CREATE INDEX IF NOT EXISTS idx_inspection_wo_conn
          ON inspection_record(work_order, connection);
        CREATE INDEX IF NOT EXISTS idx_inspection_created
          ON inspection_record(created_at);

        CREATE TABLE IF NOT EXISTS ncr_record (
          ncr_id TEXT PRIMARY KEY,
          inspection_id TEXT NOT NULL REFERENCES inspection_record(record_id),
          tier_code TEXT NOT NULL,
          nonconformance TEXT NOT NULL,
          containment TEXT NOT NULL,
          status TEXT NOT NULL CHECK(status IN ('OPEN', 'CLOSED')),
          sync_status TEXT NOT NULL DEFAULT 'PENDING' CHECK(sync_status IN ('PENDING', 'SYNCED')),
          synced_at TEXT,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ncr_inspection ON ncr_record(inspection_id);
        CREATE INDEX IF NOT EXISTS idx_ncr_created ON ncr_record(created_at);

        CREATE TABLE IF NOT EXISTS schema_version (
          version INTEGER PRIMARY KEY,
          applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        INSERT OR IGNORE INTO schema_version(version) VALUES (1);
        "#,
    )?;
    Ok(())
}
