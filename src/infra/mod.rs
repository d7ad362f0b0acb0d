//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Redis-backed session storage
//! - Unit of Work for repository access and transactions

pub mod cache;
pub mod db;
pub mod repositories;
pub mod session;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    TaskRepository, TaskStore, UserRepository, UserStore, WorkspaceRepository, WorkspaceStore,
};
pub use session::{generate_token, RedisSessionStore, SessionData, SessionStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockTaskRepository, MockUserRepository, MockWorkspaceRepository};
