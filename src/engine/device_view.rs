// ==========================================
// Emergency Device Management System - Device view assembler
// ==========================================
// Role: read-side projection of a device row plus derived deadlines
// Hard rule: derivations are computed per read and never written back;
// the InspectionDue overlay exists only in these views
// ==========================================

use crate::domain::types::DeviceStatus;
use crate::domain::EmergencyDevice;
use crate::engine::ComplianceCore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for absent text fields in list views
pub const ABSENT_TEXT: &str = "N/A";

// ==========================================
// DeviceView - detail projection (typed)
// ==========================================
// Absent stays absent here; sentinel substitution is for list rows only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceView {
    // ===== Identity and classification =====
    pub emergency_device_id: i64,
    pub emergency_device_type_name: String,
    pub extinguisher_type_name: Option<String>,

    // ===== Location =====
    pub room_code: String,
    pub building_code: String,
    pub site_name: String,

    // ===== Asset facts =====
    pub serial_number: Option<String>,
    pub manufacture_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub size: Option<String>,

    // ===== Compliance state =====
    pub last_inspection_at: Option<DateTime<Utc>>,
    pub status: Option<DeviceStatus>, // as stored

    // ===== Derived at read time =====
    pub expiry_date: Option<NaiveDate>,
    pub next_inspection_due: Option<DateTime<Utc>>,
    pub display_status: Option<DeviceStatus>,
}

// ==========================================
// DeviceListRow - list projection (display strings)
// ==========================================
// Absent text renders as "N/A", absent dates as empty strings, matching
// the register printouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceListRow {
    pub emergency_device_id: i64,
    pub emergency_device_type_name: String,
    pub extinguisher_type_name: String,
    pub room_code: String,
    pub building_code: String,
    pub site_name: String,
    pub serial_number: String,
    pub manufacture_date: String,
    pub expiry_date: String,
    pub last_inspection_at: String,
    pub next_inspection_due: String,
    pub description: String,
    pub size: String,
    pub status: String,
}

// ==========================================
// DeviceViewAssembler
// ==========================================
pub struct DeviceViewAssembler;

impl DeviceViewAssembler {
    /// Create a new DeviceViewAssembler instance
    pub fn new() -> Self {
        Self
    }

    /// Detail projection for one device
    pub fn assemble(&self, device: &EmergencyDevice, now: DateTime<Utc>) -> DeviceView {
        DeviceView {
            emergency_device_id: device.emergency_device_id,
            emergency_device_type_name: device.emergency_device_type_name.clone(),
            extinguisher_type_name: device.extinguisher_type_name.clone(),
            room_code: device.room_code.clone(),
            building_code: device.building_code.clone(),
            site_name: device.site_name.clone(),
            serial_number: device.serial_number.clone(),
            manufacture_date: device.manufacture_date,
            description: device.description.clone(),
            size: device.size.clone(),
            last_inspection_at: device.last_inspection_at,
            status: device.status,
            expiry_date: ComplianceCore::expiry_date(device.manufacture_date),
            next_inspection_due: ComplianceCore::next_inspection_due(device.last_inspection_at),
            display_status: Self::display_status(device, now),
        }
    }

    /// List projection for one device
    pub fn assemble_row(&self, device: &EmergencyDevice, now: DateTime<Utc>) -> DeviceListRow {
        DeviceListRow {
            emergency_device_id: device.emergency_device_id,
            emergency_device_type_name: device.emergency_device_type_name.clone(),
            extinguisher_type_name: Self::text_or_absent(device.extinguisher_type_name.as_deref()),
            room_code: device.room_code.clone(),
            building_code: device.building_code.clone(),
            site_name: device.site_name.clone(),
            serial_number: Self::text_or_absent(device.serial_number.as_deref()),
            manufacture_date: Self::date_or_empty(device.manufacture_date),
            expiry_date: Self::date_or_empty(ComplianceCore::expiry_date(device.manufacture_date)),
            last_inspection_at: Self::ts_or_empty(device.last_inspection_at),
            next_inspection_due: Self::ts_or_empty(ComplianceCore::next_inspection_due(
                device.last_inspection_at,
            )),
            description: Self::text_or_absent(device.description.as_deref()),
            size: Self::text_or_absent(device.size.as_deref()),
            status: match Self::display_status(device, now) {
                Some(status) => status.to_db_str().to_string(),
                None => ABSENT_TEXT.to_string(),
            },
        }
    }

    /// The display status overlay
    ///
    /// Only an Active device with a lapsed deadline is overlaid with
    /// InspectionDue; every other stored status shows through unchanged.
    fn display_status(device: &EmergencyDevice, now: DateTime<Utc>) -> Option<DeviceStatus> {
        match device.status {
            Some(DeviceStatus::Active)
                if ComplianceCore::is_inspection_overdue(device.last_inspection_at, now) =>
            {
                Some(DeviceStatus::InspectionDue)
            }
            other => other,
        }
    }

    fn text_or_absent(value: Option<&str>) -> String {
        match value {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => ABSENT_TEXT.to_string(),
        }
    }

    fn date_or_empty(value: Option<NaiveDate>) -> String {
        value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    }

    fn ts_or_empty(value: Option<DateTime<Utc>>) -> String {
        value
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_device() -> EmergencyDevice {
        EmergencyDevice {
            emergency_device_id: 3,
            emergency_device_type_id: 1,
            emergency_device_type_name: "Fire Extinguisher".to_string(),
            extinguisher_type_id: Some(2),
            extinguisher_type_name: Some("Water".to_string()),
            room_id: 4,
            room_code: "B1".to_string(),
            building_id: 2,
            building_code: "B".to_string(),
            site_id: 1,
            site_name: "Main Campus".to_string(),
            serial_number: Some("SN00002".to_string()),
            manufacture_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            description: None,
            size: None,
            last_inspection_at: Some(Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()),
            status: Some(DeviceStatus::Active),
        }
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_detail_view_derives_deadlines() {
        let assembler = DeviceViewAssembler::new();
        let view = assembler.assemble(&create_test_device(), ts(2024, 10, 1));

        assert_eq!(view.expiry_date, NaiveDate::from_ymd_opt(2029, 1, 1));
        assert_eq!(view.next_inspection_due, Some(ts(2024, 12, 1)));
        // stored status untouched, overlay not triggered yet
        assert_eq!(view.status, Some(DeviceStatus::Active));
        assert_eq!(view.display_status, Some(DeviceStatus::Active));
        // detail view keeps absence typed
        assert_eq!(view.description, None);
    }

    #[test]
    fn test_overdue_active_device_displays_inspection_due() {
        let assembler = DeviceViewAssembler::new();
        let view = assembler.assemble(&create_test_device(), ts(2024, 12, 2));

        assert_eq!(view.status, Some(DeviceStatus::Active));
        assert_eq!(view.display_status, Some(DeviceStatus::InspectionDue));
    }

    #[test]
    fn test_overlay_only_applies_to_active() {
        let assembler = DeviceViewAssembler::new();
        let mut device = create_test_device();
        device.status = Some(DeviceStatus::InspectionFailed);

        let view = assembler.assemble(&device, ts(2024, 12, 2));
        assert_eq!(view.display_status, Some(DeviceStatus::InspectionFailed));

        device.status = None;
        let view = assembler.assemble(&device, ts(2024, 12, 2));
        assert_eq!(view.display_status, None);
    }

    #[test]
    fn test_device_without_inspection_has_no_deadline() {
        let assembler = DeviceViewAssembler::new();
        let mut device = create_test_device();
        device.last_inspection_at = None;

        let view = assembler.assemble(&device, ts(2024, 12, 2));
        assert_eq!(view.next_inspection_due, None);
        // no deadline, no overlay
        assert_eq!(view.display_status, Some(DeviceStatus::Active));
    }

    #[test]
    fn test_list_row_substitutes_absent_text() {
        let assembler = DeviceViewAssembler::new();
        let mut device = create_test_device();
        device.extinguisher_type_name = None;
        device.serial_number = None;
        device.status = None;

        let row = assembler.assemble_row(&device, ts(2024, 10, 1));
        assert_eq!(row.extinguisher_type_name, "N/A");
        assert_eq!(row.serial_number, "N/A");
        assert_eq!(row.description, "N/A");
        assert_eq!(row.size, "N/A");
        assert_eq!(row.status, "N/A");
        // present fields render as-is
        assert_eq!(row.room_code, "B1");
        assert_eq!(row.manufacture_date, "2024-01-01");
        assert_eq!(row.expiry_date, "2029-01-01");
    }

    #[test]
    fn test_list_row_status_uses_display_overlay() {
        let assembler = DeviceViewAssembler::new();
        let row = assembler.assemble_row(&create_test_device(), ts(2024, 12, 2));
        assert_eq!(row.status, "Inspection Due");
    }
}
