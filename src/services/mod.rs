//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and reach repositories through the Unit of Work.

mod auth_service;
pub mod container;
mod task_service;
mod workspace_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator};
pub use task_service::{NewTask, TaskManager, TaskService};
pub use workspace_service::{WorkspaceManager, WorkspaceOverview, WorkspaceService};
