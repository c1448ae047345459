use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Role;

/// Account record. `specialization` is only meaningful for doctors.
/// Role is fixed at creation; there is no role-change operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub specialization: Option<String>,
}
