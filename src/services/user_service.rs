//! Domain service for user accounts (the credential store).
//!
//! Signup, profile edits and deletion. Ownership checks live at the HTTP
//! boundary; this service assumes the caller is allowed to act.

use thiserror::Error;
use uuid::Uuid;

use crate::models::User;
use crate::validation::{UserForm, ValidationErrors};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("No user named '{0}'")]
    UnknownUsername(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, UserError>;

    async fn get(&self, id: Uuid) -> Result<User, UserError>;

    /// Validates and stores a new account. The password is hashed before it
    /// reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] for a bad form, including an email or
    /// username that is already taken.
    async fn create(&self, form: UserForm) -> Result<User, UserError>;

    /// Like [`UserService::create`] but a blank password keeps the current one.
    async fn update(&self, id: Uuid, form: UserForm) -> Result<User, UserError>;

    async fn delete(&self, id: Uuid) -> Result<(), UserError>;

    /// Grants or revokes admin rights.
    async fn set_admin(&self, username: &str, admin: bool) -> Result<(), UserError>;
}
