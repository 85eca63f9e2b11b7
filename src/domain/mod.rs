// ==========================================
// Pipe Inspection QMS - Domain model layer
// ==========================================
// Responsibility: domain entities, closed types, pure business predicates
// Boundary: no data access logic, no engine logic
// ==========================================

pub mod directory;
pub mod inspection;
pub mod types;

// Re-export core types
pub use directory::{Employee, ToleranceBand, ToleranceRecipe, WorkOrder};
pub use inspection::{
    InspectionRecord, InspectionSubmission, NcrRecord, NcrWithInspection, ShiftContext,
};
pub use types::{InspectionStatus, NcrStatus, NcrSyncStatus, Shift};
