// ==========================================
// Emergency Device Management System - Repository layer
// ==========================================
// Role: data access, hiding SQLite details from the engines
// Hard rule: Repository holds no business logic
// Constraint: every query is parameterized
// ==========================================

pub mod action_log_repo;
pub mod contracts;
pub mod device_repo;
pub mod device_type_repo;
pub mod error;
pub mod inspection_repo;
pub mod location_repo;
pub mod user_repo;

// Re-export the core repositories and contracts
pub use action_log_repo::ActionLogRepository;
pub use contracts::{Clock, ConditionalUpdate, DeviceStore, SystemClock};
pub use device_repo::{DeviceFilter, DeviceRepository};
pub use device_type_repo::DeviceTypeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use inspection_repo::InspectionRepository;
pub use location_repo::LocationRepository;
pub use user_repo::UserRepository;
