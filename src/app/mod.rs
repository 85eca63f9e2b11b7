// ==========================================
// Pipe Inspection QMS - Application layer
// ==========================================
// Responsibility: schema bootstrap and wiring for the binaries.
// ==========================================

pub mod state;

// Re-export
pub use state::{ensure_inspection_schema, AppState};
