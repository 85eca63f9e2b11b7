// ==========================================
// Pipe Inspection QMS - Decision Core pure function library
// ==========================================
// Responsibility: tolerance evaluation, round computation, status
// assignment, NCR lifecycle classification
// Boundary: stateless, no side effects, no I/O
// ==========================================

use crate::domain::directory::ToleranceBand;
use crate::domain::types::{InspectionStatus, NcrStatus};
use std::collections::HashMap;

// ==========================================
// DecisionCore - pure function utility
// ==========================================
pub struct DecisionCore;

impl DecisionCore {
    /// Evaluate measurements against tolerance limits.
    ///
    /// # Rules
    /// - A measured key present in `limits` passes only if min <= value <= max
    /// - A measured key absent from `limits` is not evaluated and cannot fail
    /// - The submission passes overall iff every checked key passes
    ///
    /// # Arguments
    /// - measurements: measurement name -> submitted value
    /// - limits: measurement name -> tolerance band
    ///
    /// # Returns
    /// - (bool, Vec<String>): passes + decision reasons
    pub fn evaluate_measurements(
        measurements: &HashMap<String, f64>,
        limits: &HashMap<String, ToleranceBand>,
    ) -> (bool, Vec<String>) {
        let mut reasons = Vec::new();
        let mut checked = 0usize;

        // Sorted key walk keeps the reason order stable
        let mut keys: Vec<&String> = measurements.keys().collect();
        keys.sort();

        for key in keys {
            let value = measurements[key];
            if let Some(band) = limits.get(key) {
                checked += 1;
                if !band.contains(value) {
                    reasons.push(format!(
                        "OUT_OF_TOLERANCE: {}={} outside [{}, {}]",
                        key, value, band.min, band.max
                    ));
                }
            }
        }

        let passes = reasons.is_empty();
        if passes {
            reasons.push(format!("TOLERANCE_OK: {} keys checked", checked));
        }
        (passes, reasons)
    }

    /// Round for a pipe submitted out of sequence.
    ///
    /// # Rules
    /// - round = max(pipe_number - expected_next_pipe + 1, 1)
    ///
    /// The gap to the expected pipe is treated as rounds already consumed
    /// rather than rejecting the submission. Kept as its own policy
    /// function so the handling of skipped pipes can change in one place.
    pub fn round_for_out_of_sequence_pipe(pipe_number: i64, expected_next_pipe: i64) -> i64 {
        (pipe_number - expected_next_pipe + 1).max(1)
    }

    /// Compute the inspection round.
    ///
    /// # Rules
    /// 1. Prior open record exists -> round = prior_round + 1 (re-inspection)
    /// 2. pipe_number == expected_next_pipe -> round = 1 (next expected pipe)
    /// 3. Otherwise -> out-of-sequence policy
    ///
    /// # Arguments
    /// - prior_round: round of the open record for the same pipe, if any
    /// - pipe_number: submitted pipe ordinal
    /// - expected_next_pipe: highest recorded pipe for the work order/connection, plus one
    ///
    /// # Returns
    /// - (i64, Vec<String>): round + decision reasons
    pub fn determine_round(
        prior_round: Option<i64>,
        pipe_number: i64,
        expected_next_pipe: i64,
    ) -> (i64, Vec<String>) {
        let mut reasons = Vec::new();

        // Rule 1: re-inspection continues the open sequence
        if let Some(prior) = prior_round {
            reasons.push(format!("REINSPECTION: prior_round={}", prior));
            return (prior + 1, reasons);
        }

        // Rule 2: the expected next pipe starts a fresh sequence
        if pipe_number == expected_next_pipe {
            reasons.push("FIRST_INSPECTION: pipe_number matches expected_next_pipe".to_string());
            return (1, reasons);
        }

        // Rule 3: out-of-sequence policy
        let round = Self::round_for_out_of_sequence_pipe(pipe_number, expected_next_pipe);
        reasons.push(format!(
            "OUT_OF_SEQUENCE: pipe_number={} expected_next_pipe={} round={}",
            pipe_number, expected_next_pipe, round
        ));
        (round, reasons)
    }

    /// Assign the resulting status and NCR necessity.
    ///
    /// # Rules
    /// 1. Default COMPLETED
    /// 2. Tolerance failure requires an NCR; manager approval keeps COMPLETED
    /// 3. Unapproved failure escalates by round:
    ///    1 -> SECOND_INSPECTION, 2 -> THIRD_INSPECTION, else SCRAPPED
    /// 4. tier_code "Tier1" forces SCRAPPED last, over rules 1-3
    ///
    /// # Arguments
    /// - passes: tolerance evaluation result
    /// - manager_approved: manager override flag
    /// - tier_code: nonconformance tier, when supplied
    /// - round: computed inspection round
    ///
    /// # Returns
    /// - (InspectionStatus, bool, Vec<String>): status + requires_ncr + decision reasons
    pub fn determine_status(
        passes: bool,
        manager_approved: bool,
        tier_code: Option<&str>,
        round: i64,
    ) -> (InspectionStatus, bool, Vec<String>) {
        let mut reasons = Vec::new();
        let requires_ncr = !passes;
        let mut status = InspectionStatus::Completed;

        // Rules 2-3: failure path
        if !passes {
            if manager_approved {
                reasons.push("MANAGER_OVERRIDE: COMPLETED kept despite tolerance failure".to_string());
            } else {
                status = match round {
                    1 => InspectionStatus::SecondInspection,
                    2 => InspectionStatus::ThirdInspection,
                    _ => InspectionStatus::Scrapped,
                };
                reasons.push(format!("ESCALATION: round={} -> {}", round, status));
            }
        }

        // Rule 4: a Tier1 nonconformance is terminal and unrecoverable
        if tier_code == Some("Tier1") {
            status = InspectionStatus::Scrapped;
            reasons.push("TIER1: forced SCRAPPED".to_string());
        }

        if reasons.is_empty() {
            reasons.push("COMPLETED: measurements in tolerance".to_string());
        }
        (status, requires_ncr, reasons)
    }

    /// NCR lifecycle at creation time.
    ///
    /// # Rules
    /// - CLOSED iff the owning inspection's final status is terminal
    pub fn ncr_status_for(final_status: InspectionStatus) -> NcrStatus {
        if final_status.is_terminal() {
            NcrStatus::Closed
        } else {
            NcrStatus::Open
        }
    }
}
