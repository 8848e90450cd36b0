// ==========================================
// Emergency Device Management System - Inspection domain model
// ==========================================
// Role: the append-only inspection log and its submission forms
// Hard rule: inspection rows are never updated or deleted; corrections
// arrive as new submissions and the newest event time wins
// ==========================================

use crate::domain::types::InspectionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InspectionChecklist - 13 inspection points
// ==========================================
// Opaque to the engine: persisted and returned as-is, no business rules
// attach to individual points. All absent is a valid checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionChecklist {
    pub is_conspicuous: Option<bool>,
    pub is_accessible: Option<bool>,
    pub is_assigned_location: Option<bool>,
    pub is_sign_visible: Option<bool>,
    pub is_anti_tamper_device_intact: Option<bool>,
    pub is_support_bracket_secure: Option<bool>,
    pub are_operating_instructions_clear: Option<bool>,
    pub is_maintenance_tag_attached: Option<bool>,
    pub is_no_external_damage: Option<bool>,
    pub is_charge_gauge_normal: Option<bool>,
    pub is_replaced: Option<bool>,
    pub are_maintenance_records_complete: Option<bool>,
    pub work_order_required: Option<bool>,
}

// ==========================================
// Inspection - stored log entry
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    // ===== Identity =====
    pub inspection_id: i64,
    pub emergency_device_id: i64,
    pub user_id: i64,
    pub inspector_name: String, // joined username

    // ===== Event =====
    pub inspection_at: DateTime<Utc>, // event time, inspector-supplied
    pub created_at: DateTime<Utc>,    // ingestion time, clock-supplied
    pub result: InspectionResult,

    // ===== Payload =====
    pub notes: Option<String>,
    pub checklist: InspectionChecklist,
}

// ==========================================
// NewInspection - validated entry, ready for append
// ==========================================
// Produced by the inspection validator; carries typed timestamp and
// result so the acceptance path never re-parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInspection {
    pub emergency_device_id: i64,
    pub user_id: i64,
    pub inspection_at: DateTime<Utc>,
    pub result: InspectionResult,
    pub notes: Option<String>,
    pub checklist: InspectionChecklist,
}

// ==========================================
// InspectionSubmission - raw submission
// ==========================================
// Exactly what the outer surface hands over: text where the sender
// types text. Validation turns this into a NewInspection or rejects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionSubmission {
    pub emergency_device_id: i64,
    pub user_id: i64,
    pub inspection_date: String, // "YYYY-MM-DD" or RFC 3339
    pub result: String,          // expected "Passed" / "Failed"
    pub notes: String,
    #[serde(default)]
    pub checklist: InspectionChecklist,
}
