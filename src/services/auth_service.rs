//! Domain service backing the session guard.
//!
//! Resolves credentials to a user id and session user ids back to users.

use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier and wrong password are deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Checks `password` for the user whose email or username equals
    /// `identifier`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if there is no such user or
    /// the password does not match.
    async fn authenticate(&self, identifier: &str, password: &str) -> Result<Uuid, AuthError>;

    /// Loads the user a session points at. `None` if the user no longer exists.
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AuthError>;
}
