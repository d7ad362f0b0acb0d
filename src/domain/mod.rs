//! Domain layer - Core business entities and rules
//!
//! Types here are independent of persistence and HTTP concerns.

pub mod filter;
pub mod password;
pub mod task;
pub mod user;
pub mod workspace;

pub use filter::{SortDirection, TaskFilter};
pub use password::Password;
pub use task::{finished_for_status, Task, TaskChanges};
pub use user::{User, UserResponse, WorkspaceMember};
pub use workspace::{Workspace, WorkspaceRole};
