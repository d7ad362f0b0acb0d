//! Unit of Work: centralized repository access and transaction lifecycle.
//!
//! Services depend on the `UnitOfWork` trait, so tests can swap the
//! concrete `Persistence` for one backed by mock repositories.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    TaskRepository, TaskStore, UserRepository, UserStore, WorkspaceRepository, WorkspaceStore,
};
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn workspaces(&self) -> Arc<dyn WorkspaceRepository>;

    fn tasks(&self) -> Arc<dyn TaskRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    workspace_repo: Arc<WorkspaceStore>,
    task_repo: Arc<TaskStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            workspace_repo: Arc::new(WorkspaceStore::new(db.clone())),
            task_repo: Arc::new(TaskStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn workspaces(&self) -> Arc<dyn WorkspaceRepository> {
        self.workspace_repo.clone()
    }

    fn tasks(&self) -> Arc<dyn TaskRepository> {
        self.task_repo.clone()
    }
}

/// Future returned by a transaction body, borrowing the open transaction.
pub(crate) type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Run `f` inside a transaction.
///
/// Commits when `f` succeeds. On error the transaction is rolled back and the
/// body's error is returned unchanged.
pub(crate) async fn with_transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    T: Send,
{
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::debug!("Transaction rollback failed: {:?}", rollback_err);
            }
            Err(e)
        }
    }
}
