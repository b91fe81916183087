use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Represents a registered user in the system.
///
/// The password hash never leaves the process: it is skipped during
/// serialization so responses only carry the public fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Payload for registering a new user.
///
/// The role is fixed by the caller, not the request body: the public
/// registration endpoint always passes [`Role::User`], admins come from
/// seed data.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}
