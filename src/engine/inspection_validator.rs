// ==========================================
// Emergency Device Management System - Inspection validator
// ==========================================
// Role: gatekeeper for inspection submissions
// Rules run in order and the first failure wins; nothing is persisted
// for a rejected submission
// ==========================================

use crate::domain::types::InspectionResult;
use crate::domain::{EmergencyDevice, InspectionSubmission, NewInspection};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

/// Maximum notes length, counted in characters
pub const NOTES_MAX_CHARS: usize = 255;

/// Validation failures, one variant per rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("inspection date is required")]
    MissingTimestamp,

    #[error("inspection date '{0}' is not a valid date (expected YYYY-MM-DD or RFC 3339)")]
    InvalidTimestamp(String),

    #[error("inspection date {submitted} is in the future (now {now})")]
    FutureTimestamp {
        submitted: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("inspection date {inspection} precedes the manufacture date {manufacture}")]
    BeforeManufacture {
        inspection: DateTime<Utc>,
        manufacture: NaiveDate,
    },

    #[error("notes exceed {max} characters (got {len})")]
    NotesTooLong { len: usize, max: usize },

    #[error("inspection result must be 'Passed' or 'Failed' (got '{0}')")]
    InvalidResult(String),
}

// ==========================================
// InspectionValidator
// ==========================================
pub struct InspectionValidator;

impl InspectionValidator {
    /// Create a new InspectionValidator instance
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw submission against the target device
    ///
    /// Existence of the device and user is checked by the caller before
    /// this runs (missing entities are not-found conditions, not
    /// validation failures). Rules here, in order:
    /// 1. timestamp present, parseable, not in the future
    /// 2. timestamp not before the device's manufacture date
    /// 3. notes within length
    /// 4. result is exactly "Passed" or "Failed"
    ///
    /// # Returns
    /// - Ok(NewInspection): typed entry ready for acceptance
    /// - Err(ValidationError): the first rule that failed
    pub fn validate(
        &self,
        device: &EmergencyDevice,
        submission: &InspectionSubmission,
        now: DateTime<Utc>,
    ) -> Result<NewInspection, ValidationError> {
        // === Rule: timestamp present + parseable ===
        let raw = submission.inspection_date.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingTimestamp);
        }
        let inspection_at = Self::parse_inspection_timestamp(raw)
            .ok_or_else(|| ValidationError::InvalidTimestamp(raw.to_string()))?;

        // === Rule: not in the future (equal to now is fine) ===
        if inspection_at > now {
            return Err(ValidationError::FutureTimestamp {
                submitted: inspection_at,
                now,
            });
        }

        // === Rule: not before manufacture (skipped without a manufacture date) ===
        if let Some(manufacture) = device.manufacture_date {
            let manufacture_start = Self::start_of_day(manufacture);
            if inspection_at < manufacture_start {
                return Err(ValidationError::BeforeManufacture {
                    inspection: inspection_at,
                    manufacture,
                });
            }
        }

        // === Rule: notes length ===
        let notes_len = submission.notes.chars().count();
        if notes_len > NOTES_MAX_CHARS {
            return Err(ValidationError::NotesTooLong {
                len: notes_len,
                max: NOTES_MAX_CHARS,
            });
        }

        // === Rule: result token ===
        let result = InspectionResult::from_db_str(&submission.result)
            .ok_or_else(|| ValidationError::InvalidResult(submission.result.clone()))?;

        Ok(NewInspection {
            emergency_device_id: device.emergency_device_id,
            user_id: submission.user_id,
            inspection_at,
            result,
            notes: if submission.notes.is_empty() {
                None
            } else {
                Some(submission.notes.clone())
            },
            checklist: submission.checklist.clone(),
        })
    }

    /// Parse the submitted timestamp
    ///
    /// Paper forms carry plain dates (taken as midnight UTC); integrations
    /// may send a full RFC 3339 timestamp.
    fn parse_inspection_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(Self::start_of_day(d));
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
        d.and_time(NaiveTime::MIN).and_utc()
    }
}
