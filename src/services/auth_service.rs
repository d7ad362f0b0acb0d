//! Authentication service - registration and credential checks.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only orchestrates it against the user repository.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Verified against when the email is unknown so both failure paths cost
/// one Argon2 verification.
const DUMMY_PASSWORD: &str = "not-a-real-password";

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and return its id
    async fn register(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
    ) -> AppResult<i32>;

    /// Check credentials and return the user id.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<i32>;

    async fn user_exists(&self, id: i32) -> AppResult<bool>;

    async fn get_user(&self, id: i32) -> AppResult<User>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    dummy_hash: Password,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>) -> AppResult<Self> {
        Ok(Self {
            uow,
            dummy_hash: Password::new(DUMMY_PASSWORD)?,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
    ) -> AppResult<i32> {
        let password_hash = Password::new(&password)?.into_string();

        let id = self
            .uow
            .users()
            .insert(first_name, last_name, email, password_hash)
            .await?;

        tracing::info!(user_id = id, "User registered");
        Ok(id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<i32> {
        let user = match self.uow.users().get_by_email(email).await {
            Ok(user) => Some(user),
            Err(AppError::NotFound) => None,
            Err(e) => return Err(e),
        };

        match user {
            Some(user) if Password::from_hash(user.password_hash.clone()).verify(password) => Ok(user.id),
            Some(_) => Err(AppError::InvalidCredentials),
            None => {
                self.dummy_hash.verify(password);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn user_exists(&self, id: i32) -> AppResult<bool> {
        self.uow.users().exists(id).await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().get(id).await
    }
}
