// ==========================================
// Emergency Device Management System - Domain types
// ==========================================
// Closed enums with their storage string forms. The status strings keep
// the historical spelling with spaces ("Inspection Failed") because the
// device table and existing reports carry them.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Device compliance status
// ==========================================
// Written only by the status transition engine, with two exceptions:
// - InspectionDue is a read-side display overlay; the engine never stores it
// - Inactive is set and cleared by administrators; the engine neither
//   enters nor exits it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Active,           // compliant, inside the inspection window
    InspectionFailed, // latest accepted inspection failed
    Expired,          // past manufacturer expiry
    InspectionDue,    // next inspection deadline passed (display overlay)
    Inactive,         // administratively retired
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl DeviceStatus {
    /// Parse the stored string form (None for unknown or legacy free text)
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(DeviceStatus::Active),
            "inspection failed" => Some(DeviceStatus::InspectionFailed),
            "expired" => Some(DeviceStatus::Expired),
            "inspection due" => Some(DeviceStatus::InspectionDue),
            "inactive" => Some(DeviceStatus::Inactive),
            _ => None,
        }
    }

    /// The stored string form
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DeviceStatus::Active => "Active",
            DeviceStatus::InspectionFailed => "Inspection Failed",
            DeviceStatus::Expired => "Expired",
            DeviceStatus::InspectionDue => "Inspection Due",
            DeviceStatus::Inactive => "Inactive",
        }
    }
}

// ==========================================
// Inspection result
// ==========================================
// Closed two-value outcome; submissions carrying anything else are
// rejected by validation before they reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionResult {
    Passed,
    Failed,
}

impl fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl InspectionResult {
    /// Parse the submitted/stored string form (exact tokens only)
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Passed" => Some(InspectionResult::Passed),
            "Failed" => Some(InspectionResult::Failed),
            _ => None,
        }
    }

    /// The stored string form
    pub fn to_db_str(&self) -> &'static str {
        match self {
            InspectionResult::Passed => "Passed",
            InspectionResult::Failed => "Failed",
        }
    }
}

// ==========================================
// User role
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl UserRole {
    /// Parse the stored string form (unknown roles fall back to User)
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }

    /// The stored string form
    pub fn to_db_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::User => "User",
        }
    }
}
