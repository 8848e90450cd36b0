// ==========================================
// Emergency Device Management System - Location and type reference data
// ==========================================
// Role: the site -> building -> room hierarchy devices hang off, plus the
// device/extinguisher classification tables
// Hard rule: reference rows are read and seeded here; their lifecycle is
// managed elsewhere
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub site_id: i64,
    pub site_name: String,
    pub site_address: String,
    pub site_map_image_path: Option<String>, // stored path only; files live elsewhere
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub building_id: i64,
    pub site_id: i64,
    pub building_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: i64,
    pub building_id: i64,
    pub room_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyDeviceType {
    pub emergency_device_type_id: i64,
    pub emergency_device_type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtinguisherType {
    pub extinguisher_type_id: i64,
    pub extinguisher_type_name: String,
}
