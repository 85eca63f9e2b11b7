// ==========================================
// Pipe Inspection QMS - Repository layer
// ==========================================
// Responsibility: data access behind typed interfaces, no business logic
// Constraint: every query is parameterized
// ==========================================

pub mod error;
pub mod inspection_repo;
pub mod ncr_repo;

// Re-export core repositories
pub use error::{RepositoryError, RepositoryResult};
pub use inspection_repo::InspectionRepository;
pub use ncr_repo::NcrRepository;
