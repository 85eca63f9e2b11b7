// ==========================================
// Pipe Inspection QMS - Submission validator
// ==========================================
// Responsibility: field-level checks on an inspection submission
// before any rule runs. Collects every violation so the station UI
// can show them all at once instead of one per retry.
// ==========================================

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::InspectionSubmission;

// ==========================================
// SubmissionValidator
// ==========================================

/// Stateless submission checks.
///
/// Rules:
/// 1. pipe_number must be >= 1
/// 2. identity and context strings must be non-blank after trimming
/// 3. every measurement value must be a finite number
pub struct SubmissionValidator;

impl SubmissionValidator {
    /// Validate one submission.
    ///
    /// # Returns
    /// - Ok(()): submission is well-formed
    /// - Err(ApiError::SubmissionValidationError): all violations listed
    pub fn validate(submission: &InspectionSubmission) -> ApiResult<()> {
        let mut violations = Vec::new();

        if submission.pipe_number < 1 {
            violations.push(ValidationViolation {
                field: "pipe_number".to_string(),
                reason: format!("must be >= 1, got {}", submission.pipe_number),
            });
        }

        require_text(&mut violations, "adp_number", &submission.adp_number);
        require_text(&mut violations, "inspector_name", &submission.inspector_name);
        require_text(&mut violations, "operator_name", &submission.operator_name);
        require_text(&mut violations, "workstation", &submission.workstation);
        require_text(&mut violations, "work_order", &submission.work_order);
        require_text(&mut violations, "connection", &submission.connection);
        require_text(&mut violations, "fai_number", &submission.fai_number);
        require_text(&mut violations, "drawing_number", &submission.drawing_number);

        for (key, value) in &submission.measurements {
            if !value.is_finite() {
                violations.push(ValidationViolation {
                    field: format!("measurements.{}", key),
                    reason: format!("must be a finite number, got {}", value),
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::SubmissionValidationError {
                reason: format!("{} field violation(s)", violations.len()),
                violations,
            })
        }
    }
}

// ==========================================
// Helpers
// ==========================================

fn require_text(violations: &mut Vec<ValidationViolation>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(ValidationViolation {
            field: field.to_string(),
            reason: "must not be blank".to_string(),
        });
    }
}
