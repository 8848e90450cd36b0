// ==========================================
// Emergency Device Management System - Domain model layer
// ==========================================
// Role: entities, closed enums and submission forms
// Hard rule: no data access, no engine logic
// ==========================================

pub mod action_log;
pub mod device;
pub mod inspection;
pub mod location;
pub mod types;
pub mod user;

// Re-export the core types
pub use action_log::{ActionLog, ActionType};
pub use device::{EmergencyDevice, NewDevice};
pub use inspection::{Inspection, InspectionChecklist, InspectionSubmission, NewInspection};
pub use location::{Building, EmergencyDeviceType, ExtinguisherType, Room, Site};
pub use types::{DeviceStatus, InspectionResult, UserRole};
pub use user::User;
