// ==========================================
// Pipe Inspection QMS - Snapshot-backed directory
// ==========================================
// Shop-floor deployment reads the plant directory from snapshot
// exports (an external job syncs the three lists to local files).
// Employees back login, work orders feed the station UI, recipes
// carry the tolerance bands per connection type.
// ==========================================

use crate::directory::error::{DirectoryError, DirectoryResult};
use crate::directory::provider::{EmployeeDirectory, RecipeSource, WorkOrderSource};
use crate::directory::snapshot_parser::SnapshotFileParser;
use crate::domain::{Employee, ToleranceRecipe, WorkOrder};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// Snapshot file stems inside the snapshot folder
const EMPLOYEES_STEM: &str = "employees";
const WORK_ORDERS_STEM: &str = "work_orders";
const RECIPES_STEM: &str = "recipes";
const SNAPSHOT_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

// Column names as the external lists export them
const COL_ADP_NUMBER: &str = "ADPNumber";
const COL_TITLE: &str = "Title";
const COL_ACTIVE: &str = "Active";
const COL_BRANCH: &str = "Branch";
const COL_DEPARTMENT: &str = "Department";
const COL_LIMITS: &str = "limits";

// ==========================================
// SnapshotFiles
// ==========================================
/// Resolved paths of the three snapshot exports.
#[derive(Debug, Clone)]
pub struct SnapshotFiles {
    pub employees: PathBuf,
    pub work_orders: PathBuf,
    pub recipes: PathBuf,
}

impl SnapshotFiles {
    /// Locate the three exports inside a snapshot folder.
    ///
    /// Each list is found by stem (`employees`, `work_orders`,
    /// `recipes`), trying `.csv`, then `.xlsx`, then `.xls`.
    pub fn locate(snapshot_dir: &Path) -> DirectoryResult<Self> {
        Ok(SnapshotFiles {
            employees: Self::find_file(snapshot_dir, EMPLOYEES_STEM)?,
            work_orders: Self::find_file(snapshot_dir, WORK_ORDERS_STEM)?,
            recipes: Self::find_file(snapshot_dir, RECIPES_STEM)?,
        })
    }

    fn find_file(dir: &Path, stem: &str) -> DirectoryResult<PathBuf> {
        for ext in SNAPSHOT_EXTENSIONS {
            let candidate = dir.join(format!("{}.{}", stem, ext));
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(DirectoryError::FileNotFound(format!(
            "{}/{}.{{csv,xlsx,xls}}",
            dir.display(),
            stem
        )))
    }
}

// ==========================================
// SnapshotSummary
// ==========================================
/// Row counts per list after mapping, reported at startup.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SnapshotSummary {
    pub employees: usize,
    pub work_orders: usize,
    pub recipes: usize,
}

// ==========================================
// SnapshotDirectory
// ==========================================
/// Directory provider over local snapshot files.
///
/// Files are re-read on every call so an external sync job can
/// refresh them without a restart. The lists are small; each read is
/// a single pass.
#[derive(Debug, Clone)]
pub struct SnapshotDirectory {
    files: SnapshotFiles,
}

impl SnapshotDirectory {
    pub fn new(files: SnapshotFiles) -> Self {
        SnapshotDirectory { files }
    }

    /// Locate the exports in a folder and build the provider.
    pub fn locate(snapshot_dir: &Path) -> DirectoryResult<Self> {
        Ok(SnapshotDirectory::new(SnapshotFiles::locate(snapshot_dir)?))
    }

    /// Read all three lists concurrently and report their mapped row
    /// counts. Called once at startup so a missing or unreadable
    /// snapshot fails fast instead of at the first login.
    pub async fn preload(&self) -> DirectoryResult<SnapshotSummary> {
        let mut results = join_all([
            self.load_rows(&self.files.employees),
            self.load_rows(&self.files.work_orders),
            self.load_rows(&self.files.recipes),
        ])
        .await
        .into_iter();

        let (Some(employee_rows), Some(work_order_rows), Some(recipe_rows)) =
            (results.next(), results.next(), results.next())
        else {
            return Err(DirectoryError::InternalError(
                "snapshot load produced fewer results than files".to_string(),
            ));
        };

        let summary = SnapshotSummary {
            employees: Self::map_employees(employee_rows?).len(),
            work_orders: work_order_rows?.len(),
            recipes: Self::map_recipes(recipe_rows?).len(),
        };

        info!(
            employees = summary.employees,
            work_orders = summary.work_orders,
            recipes = summary.recipes,
            "directory snapshot loaded"
        );
        Ok(summary)
    }

    async fn load_rows(&self, path: &Path) -> DirectoryResult<Vec<HashMap<String, String>>> {
        let parser = SnapshotFileParser;
        parser.parse(path)
    }

    // ==========================================
    // Row -> domain mapping
    // ==========================================

    /// Rows with a blank ADPNumber are skipped; the remaining string
    /// fields stay raw so the eligibility rules evaluate them.
    fn map_employees(rows: Vec<HashMap<String, String>>) -> Vec<Employee> {
        rows.into_iter()
            .filter_map(|row| {
                let adp_number = row.get(COL_ADP_NUMBER)?.trim().to_string();
                if adp_number.is_empty() {
                    return None;
                }
                Some(Employee {
                    adp_number,
                    name: row.get(COL_TITLE).map(|v| v.trim()).unwrap_or("").to_string(),
                    active: row.get(COL_ACTIVE).cloned().unwrap_or_default(),
                    branch: row.get(COL_BRANCH).cloned().unwrap_or_default(),
                    department: row.get(COL_DEPARTMENT).cloned().unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Rows with a blank Title are skipped; the limits cell is parsed
    /// leniently (malformed JSON yields empty limits, never an error).
    fn map_recipes(rows: Vec<HashMap<String, String>>) -> Vec<ToleranceRecipe> {
        rows.into_iter()
            .filter_map(|row| {
                let connection = row.get(COL_TITLE)?.trim().to_string();
                if connection.is_empty() {
                    return None;
                }
                let limits = row
                    .get(COL_LIMITS)
                    .map(|raw| ToleranceRecipe::parse_limits(raw))
                    .unwrap_or_default();
                Some(ToleranceRecipe { connection, limits })
            })
            .collect()
    }
}

#[async_trait]
impl EmployeeDirectory for SnapshotDirectory {
    async fn eligible_employees(&self) -> DirectoryResult<Vec<Employee>> {
        let rows = self.load_rows(&self.files.employees).await?;
        let total = rows.len();
        let eligible: Vec<Employee> = Self::map_employees(rows)
            .into_iter()
            .filter(|e| e.is_eligible())
            .collect();
        debug!(total, eligible = eligible.len(), "employee snapshot read");
        Ok(eligible)
    }
}

#[async_trait]
impl WorkOrderSource for SnapshotDirectory {
    async fn list_work_orders(&self) -> DirectoryResult<Vec<WorkOrder>> {
        let rows = self.load_rows(&self.files.work_orders).await?;
        debug!(count = rows.len(), "work order snapshot read");
        Ok(rows.into_iter().map(|fields| WorkOrder { fields }).collect())
    }
}

#[async_trait]
impl RecipeSource for SnapshotDirectory {
    async fn get_recipe(&self, connection_name: &str) -> DirectoryResult<ToleranceRecipe> {
        let rows = self.load_rows(&self.files.recipes).await?;
        Self::map_recipes(rows)
            .into_iter()
            .find(|recipe| recipe.connection == connection_name)
            .ok_or_else(|| DirectoryError::RecipeNotFound(connection_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn write_snapshot_dir() -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("employees.csv"),
            "ADPNumber,Title,Active,Branch,Department\n\
             10021,Jordan Reyes,Yes,Ennis,Quality\n\
             10044,Sam Okafor,true,Ennis,Tubular\n\
             10050,Lee Tran,No,Ennis,Quality\n\
             10061,Pat Doyle,Yes,Houston,Quality\n\
             10072,Max Webb,Yes,Ennis,Shipping\n\
             ,Ghost Row,Yes,Ennis,Quality\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("work_orders.csv"),
            "WONumber,Status,Customer\n\
             WO100,Released,Acme Energy\n\
             WO200,Released,Basin Drilling\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("recipes.csv"),
            r#"Title,limits
VAM TOP 7-5/8,"{""od"": {""min"": 1.0, ""max"": 1.1}, ""ovality"": {""min"": 0.0, ""max"": 0.02}}"
HYDRIL 513,not json
,"{""od"": {""min"": 1.0, ""max"": 2.0}}"
"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_eligible_employees_filters_and_skips_blank_adp() {
        let dir = write_snapshot_dir();
        let directory = SnapshotDirectory::locate(dir.path()).unwrap();

        let employees = directory.eligible_employees().await.unwrap();

        // inactive, wrong branch, wrong department and blank ADP all drop out
        let adps: Vec<&str> = employees.iter().map(|e| e.adp_number.as_str()).collect();
        assert_eq!(adps, vec!["10021", "10044"]);
        assert_eq!(employees[0].name, "Jordan Reyes");
    }

    #[tokio::test]
    async fn test_list_work_orders_passes_raw_fields_through() {
        let dir = write_snapshot_dir();
        let directory = SnapshotDirectory::locate(dir.path()).unwrap();

        let work_orders = directory.list_work_orders().await.unwrap();

        assert_eq!(work_orders.len(), 2);
        assert_eq!(
            work_orders[0].fields.get("WONumber"),
            Some(&"WO100".to_string())
        );
        assert_eq!(
            work_orders[1].fields.get("Customer"),
            Some(&"Basin Drilling".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_recipe_matches_title_and_parses_limits() {
        let dir = write_snapshot_dir();
        let directory = SnapshotDirectory::locate(dir.path()).unwrap();

        let recipe = directory.get_recipe("VAM TOP 7-5/8").await.unwrap();

        assert_eq!(recipe.connection, "VAM TOP 7-5/8");
        assert_eq!(recipe.limits.len(), 2);
        let od = recipe.limits.get("od").unwrap();
        assert_eq!(od.min, 1.0);
        assert_eq!(od.max, 1.1);
    }

    #[tokio::test]
    async fn test_get_recipe_malformed_limits_yields_empty_bands() {
        let dir = write_snapshot_dir();
        let directory = SnapshotDirectory::locate(dir.path()).unwrap();

        let recipe = directory.get_recipe("HYDRIL 513").await.unwrap();

        assert!(recipe.limits.is_empty());
    }

    #[tokio::test]
    async fn test_get_recipe_unknown_connection() {
        let dir = write_snapshot_dir();
        let directory = SnapshotDirectory::locate(dir.path()).unwrap();

        let result = directory.get_recipe("NO SUCH CONN").await;

        match result {
            Err(DirectoryError::RecipeNotFound(name)) => assert_eq!(name, "NO SUCH CONN"),
            other => panic!("expected RecipeNotFound, got {:?}", other.map(|r| r.connection)),
        }
    }

    #[tokio::test]
    async fn test_preload_reports_mapped_counts() {
        let dir = write_snapshot_dir();
        let directory = SnapshotDirectory::locate(dir.path()).unwrap();

        let summary = directory.preload().await.unwrap();

        // blank-key rows are excluded from the mapped counts
        assert_eq!(summary.employees, 5);
        assert_eq!(summary.work_orders, 2);
        assert_eq!(summary.recipes, 2);
    }

    #[test]
    fn test_locate_missing_file() {
        let dir = tempdir().unwrap();
        let result = SnapshotFiles::locate(dir.path());
        assert!(matches!(result, Err(DirectoryError::FileNotFound(_))));
    }
}
