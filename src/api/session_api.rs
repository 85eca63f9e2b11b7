// ==========================================
// Pipe Inspection QMS - Session API
// ==========================================
// Responsibility: station login plus the directory reads the floor UI
// needs before a submission (work orders, recipes) and the health
// probe the kiosk polls.
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::directory::provider::{EmployeeDirectory, RecipeSource, WorkOrderSource};
use crate::domain::{Shift, ToleranceRecipe, WorkOrder};
use crate::engine::shift::ShiftResolver;

// ==========================================
// SessionApi
// ==========================================

/// Login and directory-read API.
///
/// Responsibilities:
/// 1. Login: eligibility lookup by ADP number + shift/station context
/// 2. Work order listing (raw passthrough)
/// 3. Recipe lookup per connection type
/// 4. Health probe
pub struct SessionApi<D>
where
    D: EmployeeDirectory + WorkOrderSource + RecipeSource,
{
    directory: Arc<D>,
    shift_resolver: Arc<ShiftResolver>,
}

impl<D> SessionApi<D>
where
    D: EmployeeDirectory + WorkOrderSource + RecipeSource,
{
    pub fn new(directory: Arc<D>, shift_resolver: Arc<ShiftResolver>) -> Self {
        Self {
            directory,
            shift_resolver,
        }
    }

    /// Log an inspector in at a workstation.
    ///
    /// # Rules
    /// 1. The ADP number must belong to an eligible employee (active,
    ///    Ennis branch, Quality or Tubular department)
    /// 2. Shift and station context come from the workstation id and
    ///    the local clock
    ///
    /// # Returns
    /// - Ok(LoginProfile): inspector identity plus shift context
    /// - Err(ApiError::EmployeeNotFound): no eligible match
    pub async fn login(&self, adp_number: &str, workstation: &str) -> ApiResult<LoginProfile> {
        if adp_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("adp_number must not be blank".to_string()));
        }
        if workstation.trim().is_empty() {
            return Err(ApiError::InvalidInput("workstation must not be blank".to_string()));
        }

        let employees = self.directory.eligible_employees().await?;
        let employee = employees
            .into_iter()
            .find(|e| e.adp_number == adp_number.trim())
            .ok_or(ApiError::EmployeeNotFound)?;

        let context = self.shift_resolver.resolve_now(workstation);
        info!(
            adp_number = %employee.adp_number,
            workstation = %workstation,
            shift = %context.shift,
            "inspector logged in"
        );

        Ok(LoginProfile {
            inspector_name: employee.name,
            adp_number: employee.adp_number,
            login_time: Utc::now(),
            shift: context.shift,
            area: context.area,
            machine_number: context.machine_number,
        })
    }

    /// List work orders for the station UI, fields passed through raw.
    pub async fn list_work_orders(&self) -> ApiResult<Vec<WorkOrder>> {
        Ok(self.directory.list_work_orders().await?)
    }

    /// Fetch the tolerance recipe for one connection type.
    pub async fn get_recipe(&self, connection_name: &str) -> ApiResult<ToleranceRecipe> {
        if connection_name.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "connection_name must not be blank".to_string(),
            ));
        }
        Ok(self.directory.get_recipe(connection_name).await?)
    }

    /// Health probe for the kiosk.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// ==========================================
// DTO types
// ==========================================

/// Login result: who the inspector is and where they are working
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginProfile {
    /// Inspector full name from the directory
    pub inspector_name: String,

    /// ADP payroll number
    pub adp_number: String,

    /// Login timestamp (UTC)
    pub login_time: DateTime<Utc>,

    /// DAY or NIGHT at login
    pub shift: Shift,

    /// Plant area of the workstation
    pub area: String,

    /// Machine number of the workstation
    pub machine_number: String,
}

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}
