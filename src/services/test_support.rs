//! Mock-backed Unit of Work shared by the service unit tests.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::{Task, User, Workspace};
use crate::infra::{
    MockTaskRepository, MockUserRepository, MockWorkspaceRepository, TaskRepository, UnitOfWork,
    UserRepository, WorkspaceRepository,
};

/// Unit of Work whose repositories are mockall mocks. A repository that was
/// not configured panics on first use.
#[derive(Default)]
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    workspaces: Arc<MockWorkspaceRepository>,
    tasks: Arc<MockTaskRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn with_users(mut self, setup: impl FnOnce(&mut MockUserRepository)) -> Self {
        let mut repo = MockUserRepository::new();
        setup(&mut repo);
        self.users = Arc::new(repo);
        self
    }

    pub(crate) fn with_workspaces(
        mut self,
        setup: impl FnOnce(&mut MockWorkspaceRepository),
    ) -> Self {
        let mut repo = MockWorkspaceRepository::new();
        setup(&mut repo);
        self.workspaces = Arc::new(repo);
        self
    }

    pub(crate) fn with_tasks(mut self, setup: impl FnOnce(&mut MockTaskRepository)) -> Self {
        let mut repo = MockTaskRepository::new();
        setup(&mut repo);
        self.tasks = Arc::new(repo);
        self
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn workspaces(&self) -> Arc<dyn WorkspaceRepository> {
        self.workspaces.clone()
    }

    fn tasks(&self) -> Arc<dyn TaskRepository> {
        self.tasks.clone()
    }
}

pub(crate) fn test_user(id: i32) -> User {
    User {
        id,
        first_name: "Test".to_string(),
        last_name: format!("User{}", id),
        email: format!("user{}@example.com", id),
        password_hash: "hashed".to_string(),
        created: Utc::now(),
    }
}

pub(crate) fn test_workspace(id: i32) -> Workspace {
    Workspace {
        id,
        title: format!("Workspace {}", id),
        description: "Test workspace".to_string(),
        created: Utc::now(),
    }
}

pub(crate) fn test_task(id: i32, workspace_id: i32) -> Task {
    Task {
        id,
        title: format!("Task {}", id),
        content: "Do the thing".to_string(),
        priority: "LOW".to_string(),
        status: "To Do".to_string(),
        created: Utc::now(),
        finished: None,
        workspace_id,
        user_id: 1,
    }
}
