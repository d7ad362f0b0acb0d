//! API middleware.

mod auth;
mod authz;
mod csrf;
mod session;

pub use auth::{auth_middleware, CurrentUser};
pub use authz::{
    require_task_admin, require_task_member, require_workspace_admin, require_workspace_member,
};
pub use csrf::csrf_middleware;
pub use session::{session_middleware, Session, SessionCommit};
