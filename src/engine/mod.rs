// ==========================================
// Pipe Inspection QMS - Engine layer
// ==========================================
// Responsibility: decision rules for inspection submissions
// Boundary: engines assemble no SQL; every rule reports a reason
// ==========================================

pub mod decision_core;
pub mod shift;
pub mod submission;

// Re-export core engines
pub use decision_core::DecisionCore;
pub use shift::{ShiftResolver, StationInfo, StationMap};
pub use submission::{NcrDefaults, SubmissionDecision, SubmissionEngine};
