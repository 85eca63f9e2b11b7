// ==========================================
// Pipe Inspection QMS - Directory Provider Traits
// ==========================================
// Responsibility: define the read-side interfaces over the plant
// directory (employees, work orders, tolerance recipes) without
// committing to a transport. Snapshot files today, a live HTTP
// directory later, behind the same three traits.
// ==========================================

use crate::directory::error::DirectoryResult;
use crate::domain::{Employee, ToleranceRecipe, WorkOrder};
use async_trait::async_trait;

// ==========================================
// EmployeeDirectory Trait
// ==========================================
// Purpose: employee lookup backing login
// Implementors: SnapshotDirectory
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// List every employee who may log in to an inspection station.
    ///
    /// # Returns
    /// - Ok(Vec<Employee>): employees that pass the eligibility filter
    ///   (active, Ennis branch, Quality or Tubular department)
    /// - Err: source read or parse failure
    async fn eligible_employees(&self) -> DirectoryResult<Vec<Employee>>;
}

// ==========================================
// WorkOrderSource Trait
// ==========================================
// Purpose: work order listing for the station UI
// Implementors: SnapshotDirectory
#[async_trait]
pub trait WorkOrderSource: Send + Sync {
    /// List all work orders known to the directory.
    ///
    /// Rows are passed through untransformed; the caller decides which
    /// columns matter to it.
    ///
    /// # Returns
    /// - Ok(Vec<WorkOrder>): raw work order rows
    /// - Err: source read or parse failure
    async fn list_work_orders(&self) -> DirectoryResult<Vec<WorkOrder>>;
}

// ==========================================
// RecipeSource Trait
// ==========================================
// Purpose: tolerance recipe lookup per connection type
// Implementors: SnapshotDirectory
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Fetch the tolerance recipe for one connection type.
    ///
    /// # Arguments
    /// - connection_name: exact connection title, e.g. "VAM TOP 7-5/8"
    ///
    /// # Returns
    /// - Ok(ToleranceRecipe): recipe with its parsed tolerance bands
    /// - Err(DirectoryError::RecipeNotFound): no recipe carries that title
    /// - Err: source read or parse failure
    async fn get_recipe(&self, connection_name: &str) -> DirectoryResult<ToleranceRecipe>;
}
