//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod task_handler;
pub mod workspace_handler;

pub use auth_handler::auth_routes;
pub use health_handler::health_routes;
pub use task_handler::{task_routes, workspace_task_routes};
pub use workspace_handler::workspace_routes;
