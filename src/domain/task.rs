//! Task domain entity and its status-driven completion rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::STATUS_COMPLETED;

/// Task domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Rotate TLS certificates")]
    pub title: String,
    #[schema(example = "Staging and production both expire next week")]
    pub content: String,
    #[schema(example = "HIGH")]
    pub priority: String,
    #[schema(example = "To Do")]
    pub status: String,
    pub created: DateTime<Utc>,
    /// Set iff `status` is "Completed"
    pub finished: Option<DateTime<Utc>>,
    pub workspace_id: i32,
    /// Assignee
    pub user_id: i32,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

/// Fields replaced wholesale by a task update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: String,
    pub content: String,
    pub priority: String,
    pub user_id: i32,
    pub status: String,
}

/// `finished` value for a task moving to `status`.
///
/// No prior completion time is kept: completing again restamps with `now`.
pub fn finished_for_status(status: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if status == STATUS_COMPLETED {
        Some(now)
    } else {
        None
    }
}
