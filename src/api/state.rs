//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, SessionStore};
use crate::services::{
    AuthService, ServiceContainer, Services, TaskService, WorkspaceService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub workspace_service: Arc<dyn WorkspaceService>,
    pub task_service: Arc<dyn TaskService>,
    /// Server-side session records
    pub sessions: Arc<dyn SessionStore>,
    /// Database connection
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the state on top of the SeaORM-backed service container.
    pub fn from_config(
        database: Arc<Database>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> AppResult<Self> {
        let container = Services::from_connection(database.get_connection())?;
        Ok(Self::new(&container, sessions, database, config))
    }

    /// Create application state from any service container.
    pub fn new(
        services: &dyn ServiceContainer,
        sessions: Arc<dyn SessionStore>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            workspace_service: services.workspaces(),
            task_service: services.tasks(),
            sessions,
            database,
            config: Arc::new(config),
        }
    }
}
