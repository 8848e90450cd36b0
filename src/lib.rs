// ==========================================
// Emergency Device Management - Core library
// ==========================================
// Stack: Rust + SQLite
// Role: compliance status engine for tracked emergency devices
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - compliance rules
pub mod engine;

// Database infrastructure (connection setup, schema, formats)
pub mod db;

// Logging setup
pub mod logging;

// API layer - operations
pub mod api;

// Application layer - wiring
pub mod app;

// ==========================================
// Re-export core types
// ==========================================

// Domain types
pub use domain::types::{DeviceStatus, InspectionResult, UserRole};

// Domain entities
pub use domain::{
    ActionLog, ActionType, EmergencyDevice, Inspection, InspectionChecklist, InspectionSubmission,
    NewDevice, NewInspection, User,
};

// Engines
pub use engine::{
    ComplianceCore, DeviceViewAssembler, InspectionValidator, StatusTransitionEngine,
};

// API
pub use api::{ApiError, ApiResult, DeviceApi, InspectionApi, SubmissionReceipt};

// ==========================================
// Constants
// ==========================================

// System version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// System name
pub const APP_NAME: &str = "Emergency Device Management System";
