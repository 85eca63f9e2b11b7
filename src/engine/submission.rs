// ==========================================
// Pipe Inspection QMS - Submission engine
// ==========================================
// Composes the decision core into persisted record shapes: one
// InspectionRecord per submission plus, on tolerance failure, one
// linked NcrRecord. No I/O; prior-record history and the clock are
// injected by the caller.
// ==========================================

use crate::domain::directory::ToleranceRecipe;
use crate::domain::inspection::{InspectionRecord, InspectionSubmission, NcrRecord, ShiftContext};
use crate::domain::types::NcrSyncStatus;
use crate::engine::decision_core::DecisionCore;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use uuid::Uuid;

// ==========================================
// NcrDefaults - texts applied when the submission leaves them blank
// ==========================================
#[derive(Debug, Clone)]
pub struct NcrDefaults {
    pub tier_code: String,
    pub nonconformance: String,
    pub containment: String,
}

impl Default for NcrDefaults {
    fn default() -> Self {
        Self {
            tier_code: "Tier2".to_string(),
            nonconformance: "Measurement out of tolerance".to_string(),
            containment: "Hold at station".to_string(),
        }
    }
}

// ==========================================
// SubmissionDecision - engine output
// ==========================================
// `reasons` carries the decision trace for logging and the dev CLI.
#[derive(Debug, Clone)]
pub struct SubmissionDecision {
    pub record: InspectionRecord,
    pub ncr: Option<NcrRecord>,
    pub reasons: Vec<String>,
}

// ==========================================
// SubmissionEngine
// ==========================================
pub struct SubmissionEngine {
    defaults: NcrDefaults,
}

impl Default for SubmissionEngine {
    fn default() -> Self {
        Self::new(NcrDefaults::default())
    }
}

impl SubmissionEngine {
    pub fn new(defaults: NcrDefaults) -> Self {
        Self { defaults }
    }

    /// Decide one submission.
    ///
    /// # Arguments
    /// - submission: validated floor input
    /// - shift_context: resolver output, copied verbatim into the record
    /// - recipe: tolerance limits for the submission's connection
    /// - prior_open_record: most recent open record for the same
    ///   (work_order, connection, pipe_number), if any
    /// - expected_next_pipe: highest recorded pipe for the work
    ///   order/connection, plus one
    /// - now: clock injected by the caller
    ///
    /// # Returns
    /// - SubmissionDecision: record + optional NCR + decision trace
    #[instrument(skip(self, submission, shift_context, recipe, prior_open_record), fields(
        work_order = %submission.work_order,
        connection = %submission.connection,
        pipe_number = submission.pipe_number,
    ))]
    pub fn decide(
        &self,
        submission: &InspectionSubmission,
        shift_context: &ShiftContext,
        recipe: &ToleranceRecipe,
        prior_open_record: Option<&InspectionRecord>,
        expected_next_pipe: i64,
        now: DateTime<Utc>,
    ) -> SubmissionDecision {
        // === Step 1: evaluate measurements against the recipe ===
        let (passes, mut reasons) =
            DecisionCore::evaluate_measurements(&submission.measurements, &recipe.limits);

        // === Step 2: compute the round ===
        let prior_round = prior_open_record.map(|r| r.round);
        let (round, round_reasons) =
            DecisionCore::determine_round(prior_round, submission.pipe_number, expected_next_pipe);
        reasons.extend(round_reasons);

        // === Step 3: assign status and NCR necessity ===
        let (status, requires_ncr, status_reasons) = DecisionCore::determine_status(
            passes,
            submission.manager_approved,
            submission.tier_code.as_deref(),
            round,
        );
        reasons.extend(status_reasons);

        // === Step 4: build the inspection record ===
        let record = InspectionRecord {
            record_id: Uuid::new_v4().to_string(),
            work_order: submission.work_order.clone(),
            connection: submission.connection.clone(),
            pipe_number: submission.pipe_number,
            round,
            status,
            inspector_adp: submission.adp_number.clone(),
            inspector_name: submission.inspector_name.clone(),
            operator_name: submission.operator_name.clone(),
            area: shift_context.area.clone(),
            machine_number: shift_context.machine_number.clone(),
            shift: shift_context.shift,
            fai_number: submission.fai_number.clone(),
            drawing_number: submission.drawing_number.clone(),
            measurements: submission.measurements.clone(),
            created_at: now,
            updated_at: now,
        };

        // === Step 5: build the NCR when tolerance failed ===
        let ncr = if requires_ncr {
            Some(NcrRecord {
                ncr_id: Uuid::new_v4().to_string(),
                inspection_id: record.record_id.clone(),
                tier_code: submission
                    .tier_code
                    .clone()
                    .unwrap_or_else(|| self.defaults.tier_code.clone()),
                nonconformance: submission
                    .nonconformance
                    .clone()
                    .unwrap_or_else(|| self.defaults.nonconformance.clone()),
                containment: submission
                    .immediate_containment
                    .clone()
                    .unwrap_or_else(|| self.defaults.containment.clone()),
                status: DecisionCore::ncr_status_for(status),
                sync_status: NcrSyncStatus::Pending,
                synced_at: None,
                created_at: now,
                updated_at: now,
            })
        } else {
            None
        };

        debug!(
            round,
            status = %status,
            requires_ncr,
            "submission decided"
        );

        SubmissionDecision { record, ncr, reasons }
    }
}
