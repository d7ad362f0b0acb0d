//! Workspace domain entity and membership roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_MEMBER};

/// Role a user holds inside a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkspaceRole {
    Admin,
    Member,
}

impl WorkspaceRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, WorkspaceRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceRole::Admin => ROLE_ADMIN,
            WorkspaceRole::Member => ROLE_MEMBER,
        }
    }
}

impl From<&str> for WorkspaceRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => WorkspaceRole::Admin,
            _ => WorkspaceRole::Member,
        }
    }
}

impl From<WorkspaceRole> for String {
    fn from(role: WorkspaceRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workspace domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Workspace {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Platform team")]
    pub title: String,
    #[schema(example = "Sprint planning and infrastructure chores")]
    pub description: String,
    pub created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_storage_value() {
        assert_eq!(WorkspaceRole::from("ADMIN"), WorkspaceRole::Admin);
        assert_eq!(WorkspaceRole::from("MEMBER"), WorkspaceRole::Member);
        assert_eq!(String::from(WorkspaceRole::Admin), "ADMIN");
    }

    #[test]
    fn test_unknown_role_grants_least_privilege() {
        assert_eq!(WorkspaceRole::from("admin"), WorkspaceRole::Member);
        assert!(!WorkspaceRole::from("OWNER").is_admin());
    }
}
