// ==========================================
// Pipe Inspection QMS - Directory layer
// ==========================================
// Responsibility: read-side access to the plant directory lists
// (employees, work orders, tolerance recipes).
// Shipped backend: snapshot files (CSV / Excel) synced by an
// external job; tests substitute in-memory fakes via the traits.
// ==========================================

// Module declarations
pub mod error;
pub mod provider;
pub mod snapshot;
pub mod snapshot_parser;

// Re-export core types
pub use error::{DirectoryError, DirectoryResult};
pub use snapshot::{SnapshotDirectory, SnapshotFiles, SnapshotSummary};
pub use snapshot_parser::{CsvSnapshotParser, ExcelSnapshotParser, SnapshotFileParser};

// Re-export trait interfaces
pub use provider::{EmployeeDirectory, RecipeSource, WorkOrderSource};
