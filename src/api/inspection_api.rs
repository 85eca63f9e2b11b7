// ==========================================
// Pipe Inspection QMS - Inspection API
// ==========================================
// Responsibility: the submit pipeline (validate, resolve shift, fetch
// recipe, decide, persist atomically) and inspection listing.
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::SubmissionValidator;
use crate::directory::provider::RecipeSource;
use crate::domain::{InspectionRecord, InspectionSubmission};
use crate::engine::shift::ShiftResolver;
use crate::engine::submission::{SubmissionDecision, SubmissionEngine};
use crate::repository::inspection_repo::InspectionRepository;

// ==========================================
// InspectionApi
// ==========================================

/// Inspection submission and listing API.
///
/// Responsibilities:
/// 1. Validate and decide submissions, persist record + NCR atomically
/// 2. List recent inspections for the station UI
pub struct InspectionApi<R: RecipeSource> {
    inspection_repo: Arc<InspectionRepository>,
    recipe_source: Arc<R>,
    shift_resolver: Arc<ShiftResolver>,
    engine: SubmissionEngine,
}

impl<R: RecipeSource> InspectionApi<R> {
    pub fn new(
        inspection_repo: Arc<InspectionRepository>,
        recipe_source: Arc<R>,
        shift_resolver: Arc<ShiftResolver>,
    ) -> Self {
        Self {
            inspection_repo,
            recipe_source,
            shift_resolver,
            engine: SubmissionEngine::default(),
        }
    }

    /// Submit one inspection.
    ///
    /// # Pipeline
    /// 1. Field validation (all violations reported at once)
    /// 2. Shift/station resolution from the workstation id
    /// 3. Recipe lookup for the connection type
    /// 4. Prior-open-round and expected-next-pipe reads
    /// 5. Decision (round, status, NCR)
    /// 6. Atomic save of record + NCR
    ///
    /// # Returns
    /// - Ok(SubmissionDecision): persisted record, NCR if raised, and
    ///   the reason trace for every rule that fired
    /// - Err(ApiError): validation, recipe lookup or save failure
    pub async fn submit_inspection(
        &self,
        submission: InspectionSubmission,
    ) -> ApiResult<SubmissionDecision> {
        SubmissionValidator::validate(&submission)?;

        let shift_context = self.shift_resolver.resolve_now(&submission.workstation);
        let recipe = self.recipe_source.get_recipe(&submission.connection).await?;

        let prior_open = self.inspection_repo.find_open_record(
            &submission.work_order,
            &submission.connection,
            submission.pipe_number,
        )?;
        let expected_next_pipe = self
            .inspection_repo
            .max_pipe_number(&submission.work_order, &submission.connection)?
            .map(|max| max + 1)
            .unwrap_or(1);

        let decision = self.engine.decide(
            &submission,
            &shift_context,
            &recipe,
            prior_open.as_ref(),
            expected_next_pipe,
            Utc::now(),
        );

        let saved = self
            .inspection_repo
            .save_with_ncr(&decision.record, decision.ncr.as_ref())?;

        info!(
            record_id = %saved.record_id,
            work_order = %saved.work_order,
            pipe_number = saved.pipe_number,
            round = saved.round,
            status = %saved.status,
            ncr = decision.ncr.is_some(),
            "inspection submitted"
        );

        Ok(SubmissionDecision {
            record: saved,
            ncr: decision.ncr,
            reasons: decision.reasons,
        })
    }

    /// List inspections, newest first.
    ///
    /// # Arguments
    /// - limit: cap on returned rows; None returns everything
    pub fn list_inspections(&self, limit: Option<i64>) -> ApiResult<Vec<InspectionRecord>> {
        if let Some(limit) = limit {
            if limit < 1 {
                return Err(ApiError::InvalidInput(format!(
                    "limit must be >= 1, got {}",
                    limit
                )));
            }
        }

        Ok(self.inspection_repo.list_recent(limit)?)
    }
}
