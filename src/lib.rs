//! Task Manager - shared workspaces with role-based membership and tasks
//!
//! Users register, log in through a cookie-backed server-side session, create
//! workspaces, invite other users, and manage tasks inside the workspaces they
//! belong to.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, session store)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Task, User, Workspace, WorkspaceRole};
pub use errors::{AppError, AppResult};
