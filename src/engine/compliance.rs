// ==========================================
// Emergency Device Management System - Compliance core (pure functions)
// ==========================================
// Role: expiry arithmetic, inspection deadlines and the status
// transition table
// Hard rule: stateless, no side effects, no I/O; "now" is always a
// parameter
// ==========================================

use crate::domain::types::{DeviceStatus, InspectionResult};
use chrono::{DateTime, Months, NaiveDate, Utc};

/// Manufacturer expiry interval: 5 years, as calendar months
pub const EXPIRY_MONTHS: u32 = 60;

/// Routine inspection interval, calendar months
pub const INSPECTION_INTERVAL_MONTHS: u32 = 3;

// ==========================================
// ComplianceCore - pure function toolbox
// ==========================================
pub struct ComplianceCore;

impl ComplianceCore {
    /// Manufacturer expiry date: manufacture date + 5 years
    ///
    /// # Rules
    /// - Calendar arithmetic with end-of-month clamping
    ///   (2024-02-29 + 5y -> 2029-02-28)
    /// - No manufacture date -> no expiry date; absent stays absent
    ///
    /// # Example
    /// ```
    /// use edms_core::engine::ComplianceCore;
    ///
    /// let manufacture = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let expiry = ComplianceCore::expiry_date(Some(manufacture));
    /// assert_eq!(expiry, chrono::NaiveDate::from_ymd_opt(2029, 1, 1));
    /// ```
    pub fn expiry_date(manufacture: Option<NaiveDate>) -> Option<NaiveDate> {
        manufacture.and_then(|d| d.checked_add_months(Months::new(EXPIRY_MONTHS)))
    }

    /// Whether the device is past manufacturer expiry
    ///
    /// # Rules
    /// - The expiry day itself already counts as expired (the stored
    ///   deadline is the midnight opening that day)
    /// - No manufacture date -> never expired by this rule
    pub fn is_expired(manufacture: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
        match Self::expiry_date(manufacture) {
            Some(expiry) => expiry <= now.date_naive(),
            None => false,
        }
    }

    /// Next routine inspection deadline: last inspection + 3 months
    ///
    /// No prior inspection -> no deadline; absent stays absent.
    pub fn next_inspection_due(last: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        last.and_then(|t| t.checked_add_months(Months::new(INSPECTION_INTERVAL_MONTHS)))
    }

    /// Whether the next inspection deadline has passed
    pub fn is_inspection_overdue(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match Self::next_inspection_due(last) {
            Some(due) => due < now,
            None => false,
        }
    }

    /// The status transition table for an applied inspection event
    ///
    /// # Rules (in order)
    /// 1. Failed result -> InspectionFailed, regardless of expiry
    /// 2. expired -> Expired
    /// 3. Passed -> Active
    ///
    /// With the closed result enum the table is total; there is no
    /// "leave unchanged" case left to reach.
    pub fn resolve_status(result: InspectionResult, expired: bool) -> DeviceStatus {
        match result {
            InspectionResult::Failed => DeviceStatus::InspectionFailed,
            InspectionResult::Passed => {
                if expired {
                    DeviceStatus::Expired
                } else {
                    DeviceStatus::Active
                }
            }
        }
    }
}
