//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! They return typed errors and never log.

pub(crate) mod entities;
mod task_repository;
mod user_repository;
mod workspace_repository;

pub use task_repository::{TaskRepository, TaskStore};
pub use user_repository::{UserRepository, UserStore};
pub use workspace_repository::{WorkspaceRepository, WorkspaceStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use task_repository::MockTaskRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use workspace_repository::MockWorkspaceRepository;
