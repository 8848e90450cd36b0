// ==========================================
// Emergency Device Management System - Status transition engine
// ==========================================
// Role: the only writer of device compliance state
// Hard rule: one event type (an accepted inspection); the newest-wins
// guard travels inside the store's conditional update, never as a
// read-compare-write here
// ==========================================

use crate::domain::types::DeviceStatus;
use crate::domain::{EmergencyDevice, NewInspection};
use crate::engine::ComplianceCore;
use crate::repository::contracts::{ConditionalUpdate, DeviceStore};
use crate::repository::error::RepositoryResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;

// ==========================================
// TransitionOutcome
// ==========================================
/// What happened to the device row
///
/// `applied == false` means the event lost the newest-wins guard; the
/// inspection itself is still on the log (the caller appends it before
/// running the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub applied: bool,
    pub status: Option<DeviceStatus>, // the written status, when applied
}

// ==========================================
// StatusTransitionEngine
// ==========================================
pub struct StatusTransitionEngine {
    devices: Arc<dyn DeviceStore>,
}

impl StatusTransitionEngine {
    /// Create a new StatusTransitionEngine instance
    pub fn new(devices: Arc<dyn DeviceStore>) -> Self {
        Self { devices }
    }

    /// Apply one validated inspection event to its device
    ///
    /// # Steps
    /// 1. Evaluate expiry against the device's manufacture date at "now"
    /// 2. Resolve the target status from the transition table
    /// 3. Hand status + event timestamp to the store's conditional update;
    ///    the guard decides applied vs stale atomically
    ///
    /// # Returns
    /// - Ok(TransitionOutcome): applied or stale
    /// - Err: storage failures, including NotFound when the device row
    ///   disappeared; surfaced unchanged, never retried here
    pub async fn apply(
        &self,
        device: &EmergencyDevice,
        inspection: &NewInspection,
        now: DateTime<Utc>,
    ) -> RepositoryResult<TransitionOutcome> {
        let expired = ComplianceCore::is_expired(device.manufacture_date, now);
        let target = ComplianceCore::resolve_status(inspection.result, expired);

        let outcome = self
            .devices
            .update_status_if_newer(device.emergency_device_id, target, inspection.inspection_at)
            .await?;

        match outcome {
            ConditionalUpdate::Applied => {
                tracing::info!(
                    "inspection applied: device={} result={} status={}",
                    device.emergency_device_id,
                    inspection.result,
                    target
                );
                Ok(TransitionOutcome {
                    applied: true,
                    status: Some(target),
                })
            }
            ConditionalUpdate::Stale => {
                tracing::info!(
                    "stale inspection: device={} event_ts={} lost to a newer record, state unchanged",
                    device.emergency_device_id,
                    inspection.inspection_at
                );
                Ok(TransitionOutcome {
                    applied: false,
                    status: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::InspectionResult;
    use crate::domain::InspectionChecklist;
    use crate::repository::error::RepositoryError;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Mutex;

    // Mock DeviceStore recording the write it receives
    struct MockDeviceStore {
        outcome: ConditionalUpdate,
        fail_not_found: bool,
        last_write: Mutex<Option<(i64, DeviceStatus, DateTime<Utc>)>>,
    }

    impl MockDeviceStore {
        fn applying() -> Self {
            Self {
                outcome: ConditionalUpdate::Applied,
                fail_not_found: false,
                last_write: Mutex::new(None),
            }
        }

        fn stale() -> Self {
            Self {
                outcome: ConditionalUpdate::Stale,
                fail_not_found: false,
                last_write: Mutex::new(None),
            }
        }

        fn missing() -> Self {
            Self {
                outcome: ConditionalUpdate::Applied,
                fail_not_found: true,
                last_write: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl DeviceStore for MockDeviceStore {
        async fn update_status_if_newer(
            &self,
            device_id: i64,
            new_status: DeviceStatus,
            inspection_at: DateTime<Utc>,
        ) -> RepositoryResult<ConditionalUpdate> {
            if self.fail_not_found {
                return Err(RepositoryError::NotFound {
                    entity: "EmergencyDevice".to_string(),
                    id: device_id.to_string(),
                });
            }
            *self.last_write.lock().unwrap() = Some((device_id, new_status, inspection_at));
            Ok(self.outcome)
        }
    }

    fn create_test_device(manufacture: Option<NaiveDate>) -> EmergencyDevice {
        EmergencyDevice {
            emergency_device_id: 7,
            emergency_device_type_id: 1,
            emergency_device_type_name: "Fire Extinguisher".to_string(),
            extinguisher_type_id: None,
            extinguisher_type_name: None,
            room_id: 1,
            room_code: "A1".to_string(),
            building_id: 1,
            building_code: "A".to_string(),
            site_id: 1,
            site_name: "Main Campus".to_string(),
            serial_number: None,
            manufacture_date: manufacture,
            description: None,
            size: None,
            last_inspection_at: None,
            status: Some(DeviceStatus::Active),
        }
    }

    fn create_inspection(result: InspectionResult, at: DateTime<Utc>) -> NewInspection {
        NewInspection {
            emergency_device_id: 7,
            user_id: 1,
            inspection_at: at,
            result,
            notes: None,
            checklist: InspectionChecklist::default(),
        }
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_passed_within_window_writes_active() {
        let store = Arc::new(MockDeviceStore::applying());
        let engine = StatusTransitionEngine::new(store.clone());
        let device = create_test_device(Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        let inspection = create_inspection(InspectionResult::Passed, ts(2024, 9, 1));

        let outcome = engine.apply(&device, &inspection, ts(2024, 9, 2)).await.unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.status, Some(DeviceStatus::Active));
        let write = store.last_write.lock().unwrap().unwrap();
        assert_eq!(write, (7, DeviceStatus::Active, ts(2024, 9, 1)));
    }

    #[tokio::test]
    async fn test_passed_after_expiry_writes_expired() {
        let store = Arc::new(MockDeviceStore::applying());
        let engine = StatusTransitionEngine::new(store.clone());
        let device = create_test_device(Some(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()));
        let inspection = create_inspection(InspectionResult::Passed, ts(2024, 9, 1));

        let outcome = engine.apply(&device, &inspection, ts(2024, 9, 2)).await.unwrap();

        assert_eq!(outcome.status, Some(DeviceStatus::Expired));
    }

    #[tokio::test]
    async fn test_failed_beats_expiry() {
        let store = Arc::new(MockDeviceStore::applying());
        let engine = StatusTransitionEngine::new(store.clone());
        let device = create_test_device(Some(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()));
        let inspection = create_inspection(InspectionResult::Failed, ts(2024, 9, 1));

        let outcome = engine.apply(&device, &inspection, ts(2024, 9, 2)).await.unwrap();

        assert_eq!(outcome.status, Some(DeviceStatus::InspectionFailed));
    }

    #[tokio::test]
    async fn test_stale_event_is_a_no_op() {
        let store = Arc::new(MockDeviceStore::stale());
        let engine = StatusTransitionEngine::new(store.clone());
        let device = create_test_device(Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        let inspection = create_inspection(InspectionResult::Failed, ts(2024, 8, 1));

        let outcome = engine.apply(&device, &inspection, ts(2024, 9, 2)).await.unwrap();

        assert!(!outcome.applied);
        assert_eq!(outcome.status, None);
    }

    #[tokio::test]
    async fn test_missing_device_surfaces_not_found() {
        let store = Arc::new(MockDeviceStore::missing());
        let engine = StatusTransitionEngine::new(store);
        let device = create_test_device(None);
        let inspection = create_inspection(InspectionResult::Passed, ts(2024, 9, 1));

        let err = engine.apply(&device, &inspection, ts(2024, 9, 2)).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
