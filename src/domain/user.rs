//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::WorkspaceRole;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created: DateTime<Utc>,
}

impl User {
    /// First and last name joined for display
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "Smith")]
    pub last_name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub created: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created: user.created,
        }
    }
}

/// A user together with their role in one workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WorkspaceMember {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "Pete")]
    pub first_name: String,
    #[schema(example = "Peterson")]
    pub last_name: String,
    #[schema(example = "pete@example.com")]
    pub email: String,
    pub role: WorkspaceRole,
}

impl WorkspaceMember {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
