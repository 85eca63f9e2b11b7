// ==========================================
// Pipe Inspection QMS - Inspection domain model
// ==========================================
// One InspectionRecord per submission, never mutated after creation.
// An NcrRecord exists iff its owning inspection failed tolerance;
// the two are written in one transaction.
// ==========================================

use crate::domain::types::{InspectionStatus, NcrStatus, NcrSyncStatus, Shift};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// InspectionRecord - one submitted inspection attempt
// ==========================================
// For a given (work_order, connection, pipe_number) the rounds form a
// monotonically increasing sequence; the highest open round is the
// live record. Matches the inspection_record table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    // ===== Primary key =====
    pub record_id: String, // UUID, generated at save time

    // ===== Pipe identity =====
    pub work_order: String,  // Owning work order id
    pub connection: String,  // Connection type (recipe key)
    pub pipe_number: i64,    // Positive pipe ordinal within the work order
    pub round: i64,          // Inspection round, >= 1
    pub status: InspectionStatus, // Decision engine output

    // ===== People =====
    pub inspector_adp: String,  // Inspector ADP number
    pub inspector_name: String, // Inspector display name
    pub operator_name: String,  // Machine operator on duty

    // ===== Station context (resolved at submission time) =====
    pub area: String,           // Physical area label
    pub machine_number: String, // Machine id at the station
    pub shift: Shift,           // DAY/NIGHT at submission

    // ===== Qualification references =====
    pub fai_number: String,     // First Article Inspection id
    pub drawing_number: String, // Engineering drawing id

    // ===== Measurements =====
    pub measurements: HashMap<String, f64>, // Measurement name -> value, stored as JSON

    // ===== Audit =====
    pub created_at: DateTime<Utc>, // Insert time
    pub updated_at: DateTime<Utc>, // Persistence-managed, equals created_at on insert
}

// ==========================================
// NcrRecord - nonconformance opened on tolerance failure
// ==========================================
// One-to-one with its owning inspection (unique FK). OPEN/CLOSED is
// fixed at creation; only the sync-tracking fields change afterwards.
// Matches the ncr_record table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcrRecord {
    // ===== Primary key and owner =====
    pub ncr_id: String,        // UUID, generated at save time
    pub inspection_id: String, // Owning inspection_record.record_id (unique)

    // ===== Nonconformance content =====
    pub tier_code: String,      // Severity tier; "Tier1" is unrecoverable
    pub nonconformance: String, // What failed
    pub containment: String,    // Immediate containment action

    // ===== Lifecycle =====
    pub status: NcrStatus, // CLOSED iff the owning inspection ended terminal

    // ===== Plant quality system push state =====
    pub sync_status: NcrSyncStatus,       // PENDING until the sync job pushes it
    pub synced_at: Option<DateTime<Utc>>, // Last successful push time

    // ===== Audit =====
    pub created_at: DateTime<Utc>, // Insert time (same transaction as the inspection)
    pub updated_at: DateTime<Utc>, // Last sync-state change
}

// ==========================================
// NcrWithInspection - NCR list entry
// ==========================================
// Joined shape for display: every NCR carries its owning inspection's
// pipe identity so the list is readable without a second lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcrWithInspection {
    pub ncr: NcrRecord,
    pub work_order: String,
    pub connection: String,
    pub pipe_number: i64,
}

// ==========================================
// InspectionSubmission - submission input
// ==========================================
// The raw payload an inspector submits from the floor. Validated by the
// API layer before the decision engine runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionSubmission {
    // ===== People =====
    pub adp_number: String,
    pub inspector_name: String,
    pub operator_name: String,

    // ===== Station =====
    pub workstation: String, // Raw workstation id, resolved to shift/area/machine

    // ===== Pipe identity =====
    pub work_order: String,
    pub connection: String,
    pub pipe_number: i64,

    // ===== Qualification references =====
    pub fai_number: String,
    pub drawing_number: String,

    // ===== Measurements =====
    #[serde(default)]
    pub measurements: HashMap<String, f64>,

    // ===== Disposition inputs =====
    #[serde(default)]
    pub manager_approved: bool, // Manager override: keep COMPLETED despite failure
    #[serde(default)]
    pub tier_code: Option<String>, // Defaults to "Tier2" on the NCR when absent
    #[serde(default)]
    pub nonconformance: Option<String>, // Defaults to standard text when absent
    #[serde(default)]
    pub immediate_containment: Option<String>, // Defaults to standard text when absent
}

// ==========================================
// ShiftContext - resolver output
// ==========================================
// Copied verbatim into the InspectionRecord at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftContext {
    pub shift: Shift,
    pub area: String,
    pub machine_number: String,
}
