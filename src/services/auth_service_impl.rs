//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::Store;
use crate::models::User;
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, identifier: &str, password: &str) -> Result<Uuid, AuthError> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        match self.store.verify_user_password(identifier, password).await? {
            Some(user_id) => {
                info!(%user_id, "User signed in");
                Ok(user_id)
            }
            None => {
                debug!("Rejected sign-in attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }
}
