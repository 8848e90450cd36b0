// ==========================================
// Emergency Device Management System - User domain model
// ==========================================
// Role: inspector identity, just enough for existence checks and for
// joining usernames into inspection history
// Hard rule: no credentials here; authentication lives outside this core
// ==========================================

use crate::domain::types::UserRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub default_admin: bool, // seeded bootstrap account, not deletable by admin tooling
}
