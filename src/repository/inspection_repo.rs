// ==========================================
// Pipe Inspection QMS - Inspection record repository
// ==========================================
// Owns the inspection_record table and the atomic save of an
// inspection with its optional NCR. No business logic here; the
// decision engine hands in finished records.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inspection::{InspectionRecord, NcrRecord};
use crate::domain::types::{InspectionStatus, Shift};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// InspectionRepository
// ==========================================
/// Inspection record store.
/// Racing submissions are serialized by a partial unique index on
/// (work_order, connection, pipe_number, status) over the open
/// statuses; the loser surfaces as UniqueConstraintViolation.
pub struct InspectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InspectionRepository {
    /// Open a repository on its own connection.
    ///
    /// # Arguments
    /// - db_path: database file path
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

    /// Atomically persist an inspection record and its optional NCR.
    ///
    /// # Arguments
    /// - record: finished inspection record
    /// - ncr: linked NCR, present iff the submission failed tolerance
    ///
    /// # Returns
    /// - Ok(InspectionRecord): the record as stored
    /// - Err(UniqueConstraintViolation): another open record won the race
    ///
    /// Both inserts run in one transaction so a crash can never leave an
    /// inspection without its required NCR, or an NCR without its owner.
    pub fn save_with_ncr(
        &self,
        record: &InspectionRecord,
        ncr: Option<&NcrRecord>,
    ) -> RepositoryResult<InspectionRecord> {
        {
            let conn = self.get_conn()?;
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                r#"
                INSERT INTO inspection_record (
                    record_id, work_order, connection, pipe_number, round, status,
                    inspector_adp, inspector_name, operator_name,
                    area, machine_number, shift,
                    fai_number, drawing_number, measurements_json,
                    created_at, updated_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17
                )
                "#,
                params![
                    record.record_id,
                    record.work_order,
                    record.connection,
                    record.pipe_number,
                    record.round,
                    record.status.to_db_str(),
                    record.inspector_adp,
                    record.inspector_name,
                    record.operator_name,
                    record.area,
                    record.machine_number,
                    record.shift.to_db_str(),
                    record.fai_number,
                    record.drawing_number,
                    serde_json::to_string(&record.measurements)
                        .map_err(RepositoryError::from)?,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;

            if let Some(ncr) = ncr {
                tx.execute(
                    r#"
                    INSERT INTO ncr_record (
                        ncr_id, inspection_id, tier_code, nonconformance, containment,
                        status, sync_status, synced_at, created_at, updated_at
                    ) VALUES (
                        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
                    )
                    "#,
                    params![
                        ncr.ncr_id,
                        ncr.inspection_id,
                        ncr.tier_code,
                        ncr.nonconformance,
                        ncr.containment,
                        ncr.status.to_db_str(),
                        ncr.sync_status.to_db_str(),
                        ncr.synced_at.map(|dt| dt.to_rfc3339()),
                        ncr.created_at.to_rfc3339(),
                        ncr.updated_at.to_rfc3339(),
                    ],
                )?;
            }

            tx.commit()?;
        }

        // Read back outside the write guard
        self.find_by_id(&record.record_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "InspectionRecord".to_string(),
                id: record.record_id.clone(),
            })
    }

    /// Look up one record by id.
    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<InspectionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE record_id = ?1",
            SELECT_INSPECTION
        ))?;

        let result = stmt.query_row(params![record_id], map_inspection_row);

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent still-open record for a pipe.
    ///
    /// # Arguments
    /// - work_order / connection / pipe_number: pipe identity
    ///
    /// # Returns
    /// - Ok(Some): the open record (highest round wins)
    /// - Ok(None): no open record, the pipe starts or restarts a sequence
    pub fn find_open_record(
        &self,
        work_order: &str,
        connection: &str,
        pipe_number: i64,
    ) -> RepositoryResult<Option<InspectionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            {}
            WHERE work_order = ?1 AND connection = ?2 AND pipe_number = ?3
              AND status IN ('FIRST_INSPECTION', 'SECOND_INSPECTION', 'THIRD_INSPECTION')
            ORDER BY round DESC, created_at DESC
            LIMIT 1
            "#,
            SELECT_INSPECTION
        ))?;

        let result = stmt.query_row(
            params![work_order, connection, pipe_number],
            map_inspection_row,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Highest pipe number ever recorded for a work order/connection.
    ///
    /// # Returns
    /// - Ok(Some(n)): highest recorded pipe
    /// - Ok(None): nothing recorded yet
    pub fn max_pipe_number(
        &self,
        work_order: &str,
        connection: &str,
    ) -> RepositoryResult<Option<i64>> {
        let conn = self.get_conn()?;
        let max: Option<i64> = conn.query_row(
            r#"
            SELECT MAX(pipe_number) FROM inspection_record
            WHERE work_order = ?1 AND connection = ?2
            "#,
            params![work_order, connection],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// All recorded inspections, newest first.
    ///
    /// # Arguments
    /// - limit: cap on returned rows; None returns everything
    pub fn list_recent(&self, limit: Option<i64>) -> RepositoryResult<Vec<InspectionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            {}
            ORDER BY created_at DESC, record_id DESC
            LIMIT ?1
            "#,
            SELECT_INSPECTION
        ))?;

        // LIMIT -1 disables the cap in SQLite
        let records = stmt
            .query_map(params![limit.unwrap_or(-1)], map_inspection_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }
}

// ==========================================
// Helpers
// ==========================================

const SELECT_INSPECTION: &str = r#"
            SELECT
                record_id, work_order, connection, pipe_number, round, status,
                inspector_adp, inspector_name, operator_name,
                area, machine_number, shift,
                fai_number, drawing_number, measurements_json,
                created_at, updated_at
            FROM inspection_record
"#;

/// Map one inspection_record row.
pub(crate) fn map_inspection_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InspectionRecord> {
    let status_raw: String = row.get(5)?;
    let status = InspectionStatus::from_str(&status_raw)
        .ok_or_else(|| column_parse_failure(5, "status", &status_raw))?;
    let shift_raw: String = row.get(11)?;
    let shift =
        Shift::from_str(&shift_raw).ok_or_else(|| column_parse_failure(11, "shift", &shift_raw))?;

    Ok(InspectionRecord {
        record_id: row.get(0)?,
        work_order: row.get(1)?,
        connection: row.get(2)?,
        pipe_number: row.get(3)?,
        round: row.get(4)?,
        status,
        inspector_adp: row.get(6)?,
        inspector_name: row.get(7)?,
        operator_name: row.get(8)?,
        area: row.get(9)?,
        machine_number: row.get(10)?,
        shift,
        fai_number: row.get(12)?,
        drawing_number: row.get(13)?,
        measurements: serde_json::from_str(&row.get::<_, String>(14)?).unwrap_or_default(),
        created_at: row
            .get::<_, String>(15)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
        updated_at: row
            .get::<_, String>(16)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Unknown enum text in a stored column becomes a conversion failure
/// instead of a silent default; a defaulted status would corrupt the
/// round sequence.
pub(crate) fn column_parse_failure(idx: usize, column: &str, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("{}: unknown value '{}'", column, raw).into(),
    )
}
