// ==========================================
// Pipe Inspection QMS - NCR repository
// ==========================================
// Reads and sync-state updates for ncr_record. Inserts happen in
// InspectionRepository::save_with_ncr, inside the owning transaction.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inspection::{NcrRecord, NcrWithInspection};
use crate::domain::types::{NcrStatus, NcrSyncStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::inspection_repo::column_parse_failure;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// NcrRepository
// ==========================================
/// NCR store. OPEN/CLOSED is immutable here; only the sync-tracking
/// columns are ever updated.
pub struct NcrRepository {
    conn: Arc<Mutex<Connection>>,
}

impl NcrRepository {
    /// Open a repository on its own connection.
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Build a repository over a shared connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Acquire the connection guard.
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Look up one NCR by id.
    pub fn find_by_id(&self, ncr_id: &str) -> RepositoryResult<Option<NcrRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE ncr_id = ?1", SELECT_NCR))?;

        let result = stmt.query_row(params![ncr_id], map_ncr_row);

        match result {
            Ok(ncr) => Ok(Some(ncr)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All NCRs newest first, each joined with its owning inspection's
    /// pipe identity for display.
    pub fn list_with_inspection(&self) -> RepositoryResult<Vec<NcrWithInspection>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                n.ncr_id, n.inspection_id, n.tier_code, n.nonconformance, n.containment,
                n.status, n.sync_status, n.synced_at, n.created_at, n.updated_at,
                i.work_order, i.connection, i.pipe_number
            FROM ncr_record n
            JOIN inspection_record i ON i.record_id = n.inspection_id
            ORDER BY n.created_at DESC, n.ncr_id DESC
            "#,
        )?;

        let entries = stmt
            .query_map([], |row| {
                Ok(NcrWithInspection {
                    ncr: map_ncr_row(row)?,
                    work_order: row.get(10)?,
                    connection: row.get(11)?,
                    pipe_number: row.get(12)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(entries)
    }

    /// Set the push state toward the plant quality system.
    ///
    /// # Arguments
    /// - ncr_id: target NCR
    /// - sync_status: PENDING clears synced_at, SYNCED stamps it with `now`
    /// - now: clock injected by the caller
    ///
    /// # Returns
    /// - Ok(NcrRecord): the updated record
    /// - Err(NotFound): unknown id
    ///
    /// Idempotent: re-marking a SYNCED record refreshes synced_at.
    pub fn update_sync_status(
        &self,
        ncr_id: &str,
        sync_status: NcrSyncStatus,
        now: DateTime<Utc>,
    ) -> RepositoryResult<NcrRecord> {
        {
            let conn = self.get_conn()?;
            let synced_at = match sync_status {
                NcrSyncStatus::Synced => Some(now.to_rfc3339()),
                NcrSyncStatus::Pending => None,
            };
            let affected = conn.execute(
                r#"
                UPDATE ncr_record
                SET sync_status = ?1, synced_at = ?2, updated_at = ?3
                WHERE ncr_id = ?4
                "#,
                params![sync_status.to_db_str(), synced_at, now.to_rfc3339(), ncr_id],
            )?;

            if affected == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "NcrRecord".to_string(),
                    id: ncr_id.to_string(),
                });
            }
        }

        // Read back outside the write guard
        self.find_by_id(ncr_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "NcrRecord".to_string(),
                id: ncr_id.to_string(),
            })
    }

    /// Mark one NCR pushed now.
    pub fn mark_synced(&self, ncr_id: &str, now: DateTime<Utc>) -> RepositoryResult<NcrRecord> {
        self.update_sync_status(ncr_id, NcrSyncStatus::Synced, now)
    }
}

// ==========================================
// Helpers
// ==========================================

const SELECT_NCR: &str = r#"
            SELECT
                ncr_id, inspection_id, tier_code, nonconformance, containment,
                status, sync_status, synced_at, created_at, updated_at
            FROM ncr_record
"#;

/// Map one ncr_record row.
fn map_ncr_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NcrRecord> {
    let status_raw: String = row.get(5)?;
    let status =
        NcrStatus::from_str(&status_raw).ok_or_else(|| column_parse_failure(5, "status", &status_raw))?;
    let sync_raw: String = row.get(6)?;
    let sync_status = NcrSyncStatus::from_str(&sync_raw)
        .ok_or_else(|| column_parse_failure(6, "sync_status", &sync_raw))?;

    Ok(NcrRecord {
        ncr_id: row.get(0)?,
        inspection_id: row.get(1)?,
        tier_code: row.get(2)?,
        nonconformance: row.get(3)?,
        containment: row.get(4)?,
        status,
        sync_status,
        synced_at: row
            .get::<_, Option<String>>(7)?
            .and_then(|s| s.parse::<DateTime<Utc>>().ok()),
        created_at: row
            .get::<_, String>(8)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
        updated_at: row
            .get::<_, String>(9)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    })
}
