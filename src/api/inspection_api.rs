// ==========================================
// Emergency Device Management - Inspection API
// ==========================================
// Role: inspection submission and inspection history queries
// Flow: resolve references -> validate -> append -> transition -> audit
// Hard rule: a rejected submission persists nothing; a stale one
// persists the inspection row but never touches the device
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::db::format_timestamp;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::types::DeviceStatus;
use crate::domain::{Inspection, InspectionSubmission};
use crate::engine::{InspectionValidator, StatusTransitionEngine};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::contracts::Clock;
use crate::repository::device_repo::DeviceRepository;
use crate::repository::inspection_repo::InspectionRepository;
use crate::repository::user_repo::UserRepository;

// ==========================================
// SubmissionReceipt - outcome handed back to the submitter
// ==========================================
/// What the submitter learns about one submission.
///
/// `accepted == false` with `Ok` means the inspection was recorded but a
/// newer inspection already governs the device, so its status is
/// unchanged. Validation failures never produce a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub inspection_id: i64,
    pub accepted: bool,
    pub status: Option<DeviceStatus>, // status written when accepted
}

// ==========================================
// InspectionApi
// ==========================================

/// Inspection API
///
/// Responsibilities:
/// 1. Submission intake (reference checks, validation, append)
/// 2. Driving the status transition engine
/// 3. Audit trail entries for applied and stale events
/// 4. Inspection history queries
pub struct InspectionApi {
    device_repo: Arc<DeviceRepository>,
    user_repo: Arc<UserRepository>,
    inspection_repo: Arc<InspectionRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    validator: InspectionValidator,
    transition_engine: Arc<StatusTransitionEngine>,
    clock: Arc<dyn Clock>,
}

impl InspectionApi {
    pub fn new(
        device_repo: Arc<DeviceRepository>,
        user_repo: Arc<UserRepository>,
        inspection_repo: Arc<InspectionRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        transition_engine: Arc<StatusTransitionEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            device_repo,
            user_repo,
            inspection_repo,
            action_log_repo,
            validator: InspectionValidator::new(),
            transition_engine,
            clock,
        }
    }

    // ==========================================
    // Submission
    // ==========================================

    /// Submit one inspection for a device.
    ///
    /// # Arguments
    /// - submission: raw submission as entered (text date, text result)
    ///
    /// # Returns
    /// - Ok(SubmissionReceipt): inspection recorded; `accepted` says
    ///   whether the device status was rewritten
    /// - Err(ApiError::NotFound): device or submitting user unknown
    /// - Err(ApiError::Validation): submission rejected, nothing stored
    /// - Err(other): storage failure, surfaced as-is
    ///
    /// # Rules
    /// - References are resolved before any content validation
    /// - The inspection is appended before the transition attempt and
    ///   is kept even when the transition loses the newest-wins guard
    /// - Audit logging is best-effort and never fails the submission
    pub async fn submit_inspection(
        &self,
        submission: &InspectionSubmission,
    ) -> ApiResult<SubmissionReceipt> {
        let now = self.clock.now();

        // Resolve references first so "unknown device" is reported as
        // not-found rather than as a validation failure
        let device = self
            .device_repo
            .find_by_id(submission.emergency_device_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "EmergencyDevice (id={}) does not exist",
                    submission.emergency_device_id
                ))
            })?;
        let inspector = self
            .user_repo
            .find_by_id(submission.user_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("User (id={}) does not exist", submission.user_id))
            })?;

        // Content validation; first broken rule wins
        let entry = self.validator.validate(&device, submission, now)?;

        // Append to the log, then let the engine decide the status
        let inspection_id = self.inspection_repo.append(&entry, now)?;
        let outcome = self.transition_engine.apply(&device, &entry, now).await?;

        if outcome.applied {
            info!(
                "inspection accepted: device_id={}, inspection_id={}, result={}, status={:?}",
                device.emergency_device_id,
                inspection_id,
                entry.result.to_db_str(),
                outcome.status
            );
        } else {
            info!(
                "inspection recorded but stale: device_id={}, inspection_id={}, inspection_at={}",
                device.emergency_device_id,
                inspection_id,
                format_timestamp(&entry.inspection_at)
            );
        }

        // Best-effort audit entry
        let action_type = if outcome.applied {
            ActionType::InspectionApplied
        } else {
            ActionType::InspectionStale
        };
        let log = ActionLog {
            action_id: uuid::Uuid::new_v4().to_string(),
            emergency_device_id: device.emergency_device_id,
            inspection_id: Some(inspection_id),
            action_type,
            action_ts: now,
            actor: inspector.username.clone(),
            from_status: device.status,
            to_status: outcome.status,
            payload_json: Some(serde_json::json!({
                "result": entry.result.to_db_str(),
                "inspection_at": format_timestamp(&entry.inspection_at),
            })),
        };
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(
                "action log write failed (submission unaffected): device_id={}, error={}",
                device.emergency_device_id, e
            );
        }

        Ok(SubmissionReceipt {
            inspection_id,
            accepted: outcome.applied,
            status: outcome.status,
        })
    }

    // ==========================================
    // Queries
    // ==========================================

    /// Fetch one inspection by id.
    pub fn get_inspection(&self, inspection_id: i64) -> ApiResult<Inspection> {
        self.inspection_repo
            .find_by_id(inspection_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Inspection (id={}) does not exist", inspection_id))
            })
    }

    /// List a device's inspections, newest event first.
    ///
    /// # Returns
    /// - Ok(Vec<Inspection>): may be empty
    /// - Err(ApiError::NotFound): the device itself is unknown
    pub fn list_inspections(&self, device_id: i64) -> ApiResult<Vec<Inspection>> {
        if self.device_repo.find_by_id(device_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "EmergencyDevice (id={}) does not exist",
                device_id
            )));
        }
        Ok(self.inspection_repo.list_by_device(device_id)?)
    }
}
