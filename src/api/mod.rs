// ==========================================
// Pipe Inspection QMS - API layer
// ==========================================
// Responsibility: the operations the station binaries expose, built
// over the repositories, the directory providers and the engines.
// ==========================================

pub mod error;
pub mod inspection_api;
pub mod ncr_api;
pub mod session_api;
pub mod validator;

// Re-export core types
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use inspection_api::InspectionApi;
pub use ncr_api::NcrApi;
pub use session_api::{HealthStatus, LoginProfile, SessionApi};
pub use validator::SubmissionValidator;
