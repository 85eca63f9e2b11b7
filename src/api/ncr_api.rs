// ==========================================
// Pipe Inspection QMS - NCR API
// ==========================================
// Responsibility: NCR listing for the quality board and sync-state
// updates driven by the external push job.
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{NcrRecord, NcrSyncStatus, NcrWithInspection};
use crate::repository::ncr_repo::NcrRepository;

// ==========================================
// NcrApi
// ==========================================

/// NCR listing and sync tracking API.
///
/// Responsibilities:
/// 1. List NCRs newest first, joined with their owning inspection
/// 2. Mark NCRs synced after the external push job delivers them
pub struct NcrApi {
    ncr_repo: Arc<NcrRepository>,
}

impl NcrApi {
    pub fn new(ncr_repo: Arc<NcrRepository>) -> Self {
        Self { ncr_repo }
    }

    /// List every NCR with its owning inspection keys, newest first.
    pub fn list_ncrs(&self) -> ApiResult<Vec<NcrWithInspection>> {
        Ok(self.ncr_repo.list_with_inspection()?)
    }

    /// Mark one NCR as delivered to the plant quality system.
    ///
    /// Idempotent: re-marking a synced NCR refreshes its synced_at.
    ///
    /// # Returns
    /// - Ok(NcrRecord): updated record
    /// - Err(ApiError::NotFound): unknown ncr_id
    pub fn mark_synced(&self, ncr_id: &str) -> ApiResult<NcrRecord> {
        if ncr_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("ncr_id must not be blank".to_string()));
        }

        let updated = self.ncr_repo.mark_synced(ncr_id, Utc::now())?;
        info!(ncr_id = %updated.ncr_id, "NCR marked synced");
        Ok(updated)
    }

    /// Set an NCR's sync status directly.
    ///
    /// Setting PENDING clears synced_at so the push job retries it.
    pub fn update_sync_status(
        &self,
        ncr_id: &str,
        sync_status: NcrSyncStatus,
    ) -> ApiResult<NcrRecord> {
        if ncr_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("ncr_id must not be blank".to_string()));
        }

        let updated = self
            .ncr_repo
            .update_sync_status(ncr_id, sync_status, Utc::now())?;
        info!(
            ncr_id = %updated.ncr_id,
            sync_status = %updated.sync_status,
            "NCR sync status updated"
        );
        Ok(updated)
    }
}
