// ==========================================
// Pipe Inspection QMS - External directory domain model
// ==========================================
// Shapes read from the external directory lists: employee roster,
// production work orders, tolerance recipes. Read-only inputs.
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Employee - roster entry
// ==========================================
// Raw roster strings are kept as-is; eligibility is a predicate so the
// roster snapshot never has to be rewritten when rules change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub adp_number: String, // Payroll id, the login key
    pub name: String,       // Display name
    pub active: String,     // Raw active flag ("Yes"/"true"/"1"/...)
    pub branch: String,     // Site branch
    pub department: String, // Department label
}

impl Employee {
    /// Login eligibility: active flag truthy, branch Ennis, department
    /// Quality or Tubular.
    ///
    /// Accepted truthy spellings (case-insensitive): "yes", "true", "1".
    pub fn is_eligible(&self) -> bool {
        let active = matches!(
            self.active.trim().to_lowercase().as_str(),
            "yes" | "true" | "1"
        );
        active
            && self.branch.trim() == "Ennis"
            && matches!(self.department.trim(), "Quality" | "Tubular")
    }
}

// ==========================================
// WorkOrder - production operations entry
// ==========================================
// Passed through raw for the floor UI to pick from; this side never
// interprets the columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub fields: HashMap<String, String>,
}

// ==========================================
// ToleranceRecipe - tolerance limits for a connection type
// ==========================================
// A measured key absent from `limits` is not checked and cannot fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToleranceRecipe {
    pub connection: String, // Recipe title, matched against the submission's connection
    pub limits: HashMap<String, ToleranceBand>,
}

/// Inclusive tolerance band for one measurement name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub min: f64,
    pub max: f64,
}

impl ToleranceBand {
    /// True when `min <= value <= max`.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl ToleranceRecipe {
    /// Parse a limits column that arrives as a JSON string.
    ///
    /// The directory stores limits either structured or as text; text is
    /// parsed leniently. Malformed JSON or a non-mapping shape yields an
    /// empty limits map, never an error.
    pub fn parse_limits(raw: &str) -> HashMap<String, ToleranceBand> {
        serde_json::from_str::<HashMap<String, ToleranceBand>>(raw).unwrap_or_default()
    }
}
