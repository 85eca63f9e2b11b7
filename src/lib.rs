// ==========================================
// Pipe Inspection QMS - Core library
// ==========================================
// Stack: Rust + SQLite + directory snapshots
// Purpose: pipe connection inspection with bounded re-inspection
// escalation and NCR tracking at the Ennis threading floor
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - decision rules
pub mod engine;

// Directory layer - plant directory reads
pub mod directory;

// Configuration layer - startup settings
pub mod config;

// Database infrastructure (connection init / PRAGMA policy)
pub mod db;

// Logging
pub mod logging;

// API layer - business operations
pub mod api;

// Application layer - wiring for the binaries
pub mod app;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::types::{InspectionStatus, NcrStatus, NcrSyncStatus, Shift};

// Domain entities
pub use domain::{
    Employee, InspectionRecord, InspectionSubmission, NcrRecord, NcrWithInspection, ShiftContext,
    ToleranceBand, ToleranceRecipe, WorkOrder,
};

// Engines
pub use engine::{DecisionCore, ShiftResolver, StationMap, SubmissionEngine};

// API
pub use api::{InspectionApi, NcrApi, SessionApi};

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Pipe Inspection QMS";
