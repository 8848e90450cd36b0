// ==========================================
// Emergency Device Management System - Action log domain model
// ==========================================
// Role: audit trail of submission outcomes and registrations
// Hard rule: every status-affecting write leaves an entry; entries are
// append-only
// ==========================================

use crate::domain::types::DeviceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - audit entry
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    // ===== Identity =====
    pub action_id: String, // uuid v4
    pub emergency_device_id: i64,
    pub inspection_id: Option<i64>, // absent for registrations

    // ===== What happened =====
    pub action_type: ActionType,
    pub action_ts: DateTime<Utc>,
    pub actor: String, // inspector username, or "system"
    pub from_status: Option<DeviceStatus>,
    pub to_status: Option<DeviceStatus>,

    // ===== Payload =====
    pub payload_json: Option<JsonValue>,
}

// ==========================================
// ActionType
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    InspectionApplied, // accepted event, device state rewritten
    InspectionStale,   // logged but lost the newest-wins guard
    DeviceRegistered,  // new device row created
}

impl ActionType {
    /// Parse the stored string form
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "INSPECTION_APPLIED" => Some(ActionType::InspectionApplied),
            "INSPECTION_STALE" => Some(ActionType::InspectionStale),
            "DEVICE_REGISTERED" => Some(ActionType::DeviceRegistered),
            _ => None,
        }
    }

    /// The stored string form
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::InspectionApplied => "INSPECTION_APPLIED",
            ActionType::InspectionStale => "INSPECTION_STALE",
            ActionType::DeviceRegistered => "DEVICE_REGISTERED",
        }
    }
}
