//! Task listing filters and sort order.

use serde::Deserialize;

use crate::config::SORT_DESC;

/// Optional predicates narrowing a workspace's task list.
///
/// Each field is either absent or a non-empty value; empty input strings are
/// normalized away so "no filter" and "empty filter" are the same query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Substring match on the title
    pub title: Option<String>,
    /// Exact match on priority
    pub priority: Option<String>,
    /// Exact match on status
    pub status: Option<String>,
}

impl TaskFilter {
    pub fn new(title: &str, priority: &str, status: &str) -> Self {
        Self {
            title: non_empty(title),
            priority: non_empty(priority),
            status: non_empty(status),
        }
    }

    /// Filter with no predicates (the whole workspace)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.priority.is_none() && self.status.is_none()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Ordering on the creation timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact keyword "desc" sorts descending; anything else is ascending.
    pub fn parse(value: &str) -> Self {
        if value == SORT_DESC {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}
