// ==========================================
// Emergency Device Management System - Engine layer
// ==========================================
// Role: the compliance business rules
// Hard rule: engines do not assemble SQL; guarded writes go through the
// storage contracts
// ==========================================

pub mod compliance;
pub mod device_view;
pub mod inspection_validator;
pub mod status_transition;

// Re-export the core engines
pub use compliance::{ComplianceCore, EXPIRY_MONTHS, INSPECTION_INTERVAL_MONTHS};
pub use device_view::{DeviceListRow, DeviceView, DeviceViewAssembler, ABSENT_TEXT};
pub use inspection_validator::{InspectionValidator, ValidationError, NOTES_MAX_CHARS};
pub use status_transition::{StatusTransitionEngine, TransitionOutcome};
