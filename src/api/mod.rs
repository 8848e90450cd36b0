// ==========================================
// Emergency Device Management - API layer
// ==========================================
// Role: the operations an outer surface (CLI, HTTP, UI shell) calls
// ==========================================

pub mod device_api;
pub mod error;
pub mod inspection_api;

// Re-export the core types
pub use device_api::DeviceApi;
pub use error::{ApiError, ApiResult};
pub use inspection_api::{InspectionApi, SubmissionReceipt};
