//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through this container, which depends
//! on the service traits rather than their implementations.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, TaskManager, TaskService, WorkspaceManager, WorkspaceService,
};
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn workspaces(&self) -> Arc<dyn WorkspaceService>;

    fn tasks(&self) -> Arc<dyn TaskService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    workspace_service: Arc<dyn WorkspaceService>,
    task_service: Arc<dyn TaskService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        workspace_service: Arc<dyn WorkspaceService>,
        task_service: Arc<dyn TaskService>,
    ) -> Self {
        Self {
            auth_service,
            workspace_service,
            task_service,
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(db));

        Ok(Self {
            auth_service: Arc::new(Authenticator::new(uow.clone())?),
            workspace_service: Arc::new(WorkspaceManager::new(uow.clone())),
            task_service: Arc::new(TaskManager::new(uow)),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn workspaces(&self) -> Arc<dyn WorkspaceService> {
        self.workspace_service.clone()
    }

    fn tasks(&self) -> Arc<dyn TaskService> {
        self.task_service.clone()
    }
}
