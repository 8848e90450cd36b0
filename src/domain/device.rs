// ==========================================
// Emergency Device Management System - Device domain model
// ==========================================
// Role: the tracked asset (fire extinguishers and similar equipment)
// Hard rule: expiry and next-due deadlines are derived at read time and
// never stored on the row
// ==========================================

use crate::domain::types::DeviceStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// EmergencyDevice - stored device plus joined location/type names
// ==========================================
// Loaded through the device repository's join; the name fields mirror the
// reference tables the row points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyDevice {
    // ===== Identity =====
    pub emergency_device_id: i64,

    // ===== Classification =====
    pub emergency_device_type_id: i64,
    pub emergency_device_type_name: String,
    pub extinguisher_type_id: Option<i64>,
    pub extinguisher_type_name: Option<String>,

    // ===== Location =====
    pub room_id: i64,
    pub room_code: String,
    pub building_id: i64,
    pub building_code: String,
    pub site_id: i64,
    pub site_name: String,

    // ===== Asset facts =====
    pub serial_number: Option<String>,
    pub manufacture_date: Option<NaiveDate>, // immutable once registered
    pub description: Option<String>,
    pub size: Option<String>,

    // ===== Compliance state (engine-owned) =====
    pub last_inspection_at: Option<DateTime<Utc>>,
    pub status: Option<DeviceStatus>,
}

// ==========================================
// NewDevice - registration input
// ==========================================
// Validated by the device api before insert; the engine itself never
// creates devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDevice {
    pub emergency_device_type_id: i64,
    pub extinguisher_type_id: Option<i64>,
    pub room_id: i64,
    pub serial_number: Option<String>,
    pub manufacture_date: Option<NaiveDate>,
    pub last_inspection_at: Option<DateTime<Utc>>, // pre-loaded paper records
    pub description: Option<String>,
    pub size: Option<String>,
    pub status: Option<DeviceStatus>, // initial status, admin-chosen
}
