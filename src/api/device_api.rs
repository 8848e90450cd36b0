// ==========================================
// Emergency Device Management - Device API
// ==========================================
// Role: device registration and read-side device views
// Hard rule: views are derived at read time from stored facts; this
// module never writes a status (the transition engine owns that)
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::{NewDevice, Site};
use crate::engine::{DeviceListRow, DeviceView, DeviceViewAssembler};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::contracts::Clock;
use crate::repository::device_repo::{DeviceFilter, DeviceRepository};
use crate::repository::device_type_repo::DeviceTypeRepository;
use crate::repository::location_repo::LocationRepository;

/// Registration field limits (storage column widths)
const SERIAL_MAX_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 255;
const SIZE_MAX_CHARS: usize = 50;

// ==========================================
// DeviceApi
// ==========================================

/// Device API
///
/// Responsibilities:
/// 1. Device registration (reference + field validation, audit entry)
/// 2. Device detail views with derived compliance deadlines
/// 3. Device list views for the census screens
/// 4. Per-device audit trail queries
pub struct DeviceApi {
    device_repo: Arc<DeviceRepository>,
    location_repo: Arc<LocationRepository>,
    device_type_repo: Arc<DeviceTypeRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    assembler: DeviceViewAssembler,
    clock: Arc<dyn Clock>,
}

impl DeviceApi {
    pub fn new(
        device_repo: Arc<DeviceRepository>,
        location_repo: Arc<LocationRepository>,
        device_type_repo: Arc<DeviceTypeRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            device_repo,
            location_repo,
            device_type_repo,
            action_log_repo,
            assembler: DeviceViewAssembler::new(),
            clock,
        }
    }

    // ==========================================
    // Registration
    // ==========================================

    /// Register a new device.
    ///
    /// # Arguments
    /// - new_device: registration input, references rooms/types by id
    /// - actor: who performed the registration (audit trail only)
    ///
    /// # Returns
    /// - Ok(i64): id of the created device
    /// - Err(ApiError::NotFound): room or type reference unknown
    /// - Err(ApiError::InvalidInput): a field is blank, too long, or
    ///   carries an impossible date
    ///
    /// # Rules
    /// - Serial numbers are unique; duplicates surface as a business
    ///   rule violation from storage
    /// - A pre-loaded last inspection must not predate manufacture and
    ///   must not lie in the future
    pub fn register_device(&self, new_device: &NewDevice, actor: &str) -> ApiResult<i64> {
        let now = self.clock.now();

        // References first, field content second (same order the
        // inspection flow uses)
        if !self.location_repo.room_exists(new_device.room_id)? {
            return Err(ApiError::NotFound(format!(
                "Room (id={}) does not exist",
                new_device.room_id
            )));
        }
        if !self
            .device_type_repo
            .device_type_exists(new_device.emergency_device_type_id)?
        {
            return Err(ApiError::NotFound(format!(
                "EmergencyDeviceType (id={}) does not exist",
                new_device.emergency_device_type_id
            )));
        }
        if let Some(ext_type_id) = new_device.extinguisher_type_id {
            if !self.device_type_repo.extinguisher_type_exists(ext_type_id)? {
                return Err(ApiError::NotFound(format!(
                    "ExtinguisherType (id={}) does not exist",
                    ext_type_id
                )));
            }
        }

        validate_registration(new_device, now)?;

        let device_id = self.device_repo.insert(new_device)?;
        info!(
            "device registered: device_id={}, serial={:?}, room_id={}",
            device_id, new_device.serial_number, new_device.room_id
        );

        // Best-effort audit entry
        let log = ActionLog {
            action_id: uuid::Uuid::new_v4().to_string(),
            emergency_device_id: device_id,
            inspection_id: None,
            action_type: ActionType::DeviceRegistered,
            action_ts: now,
            actor: actor.to_string(),
            from_status: None,
            to_status: new_device.status,
            payload_json: Some(serde_json::json!({
                "serial_number": new_device.serial_number,
                "room_id": new_device.room_id,
            })),
        };
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(
                "action log write failed (registration unaffected): device_id={}, error={}",
                device_id, e
            );
        }

        Ok(device_id)
    }

    // ==========================================
    // Views
    // ==========================================

    /// Fetch one device with its derived compliance view.
    pub fn get_device_view(&self, device_id: i64) -> ApiResult<DeviceView> {
        let device = self.device_repo.find_by_id(device_id)?.ok_or_else(|| {
            ApiError::NotFound(format!("EmergencyDevice (id={}) does not exist", device_id))
        })?;
        Ok(self.assembler.assemble(&device, self.clock.now()))
    }

    /// List devices as display rows, optionally filtered by location.
    pub fn list_device_views(&self, filter: &DeviceFilter) -> ApiResult<Vec<DeviceListRow>> {
        let now = self.clock.now();
        let devices = self.device_repo.list(filter)?;
        Ok(devices
            .iter()
            .map(|d| self.assembler.assemble_row(d, now))
            .collect())
    }

    /// Count devices grouped by stored status (startup census, dashboards).
    pub fn device_census(&self) -> ApiResult<Vec<(String, i64)>> {
        Ok(self.device_repo.count_by_status()?)
    }

    /// List sites, ordered by name (location filter choices).
    pub fn list_sites(&self) -> ApiResult<Vec<Site>> {
        Ok(self.location_repo.list_sites()?)
    }

    // ==========================================
    // Audit trail
    // ==========================================

    /// List a device's audit entries, newest first.
    pub fn list_action_log(&self, device_id: i64) -> ApiResult<Vec<ActionLog>> {
        if self.device_repo.find_by_id(device_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "EmergencyDevice (id={}) does not exist",
                device_id
            )));
        }
        Ok(self.action_log_repo.list_by_device(device_id)?)
    }
}

// ==========================================
// Registration field validation
// ==========================================

/// Field-level registration checks, applied after reference checks.
fn validate_registration(device: &NewDevice, now: DateTime<Utc>) -> Result<(), ApiError> {
    if let Some(serial) = device.serial_number.as_deref() {
        if serial.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "serial number must not be blank".to_string(),
            ));
        }
        if serial.chars().count() > SERIAL_MAX_CHARS {
            return Err(ApiError::InvalidInput(format!(
                "serial number exceeds {} characters",
                SERIAL_MAX_CHARS
            )));
        }
    }
    if let Some(description) = device.description.as_deref() {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(ApiError::InvalidInput(format!(
                "description exceeds {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }
    }
    if let Some(size) = device.size.as_deref() {
        if size.chars().count() > SIZE_MAX_CHARS {
            return Err(ApiError::InvalidInput(format!(
                "size exceeds {} characters",
                SIZE_MAX_CHARS
            )));
        }
    }
    if let Some(manufacture) = device.manufacture_date {
        if manufacture > now.date_naive() {
            return Err(ApiError::InvalidInput(
                "manufacture date must not be in the future".to_string(),
            ));
        }
    }
    if let Some(last_inspection) = device.last_inspection_at {
        if last_inspection > now {
            return Err(ApiError::InvalidInput(
                "last inspection must not be in the future".to_string(),
            ));
        }
        if let Some(manufacture) = device.manufacture_date {
            let manufacture_start = manufacture.and_time(NaiveTime::MIN).and_utc();
            if last_inspection < manufacture_start {
                return Err(ApiError::InvalidInput(
                    "last inspection must not predate manufacture".to_string(),
                ));
            }
        }
    }
    Ok(())
}

// ==========================================
// Tests
// ==========================================
