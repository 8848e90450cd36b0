// ==========================================
// Emergency Device Management System - Storage contracts
// ==========================================
// Role: the behaviors the engines depend on (no implementations here)
// Hard rule: no SQL, no business logic; engine tests mock these
// ==========================================

use crate::domain::DeviceStatus;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// ==========================================
// ConditionalUpdate - outcome of the guarded status write
// ==========================================
// Applied: the row was rewritten. Stale: a newer-or-equal inspection
// timestamp is already stored and the row was left untouched. A missing
// device is reported as a NotFound error, not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalUpdate {
    Applied,
    Stale,
}

// ==========================================
// DeviceStore
// ==========================================
// Implementor: DeviceRepository (SQLite)
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Atomically set status + last_inspection_at, guarded by
    /// "only if this inspection is newer than the stored one"
    ///
    /// The guard and the write must be one storage operation; callers
    /// must not re-implement it as read-compare-write.
    async fn update_status_if_newer(
        &self,
        device_id: i64,
        new_status: DeviceStatus,
        inspection_at: DateTime<Utc>,
    ) -> RepositoryResult<ConditionalUpdate>;
}

// ==========================================
// Clock
// ==========================================
// "Now" is always injected so validation and expiry checks are
// reproducible in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
