//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::models::User;
use crate::services::user_service::{UserError, UserService};
use crate::validation::{UserCheck, UserForm, validate_new_user, validate_user_changes};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn check(
        &self,
        form: UserForm,
        own_id: Option<Uuid>,
    ) -> Result<UserCheck, UserError> {
        let form = form.normalized();

        let email_taken = match form.email.as_deref() {
            Some(email) => self.store.email_taken(email, own_id).await?,
            None => false,
        };
        let username_taken = match form.username.as_deref() {
            Some(username) => self.store.username_taken(username, own_id).await?,
            None => false,
        };

        Ok(UserCheck {
            form,
            email_taken,
            username_taken,
            password_required: own_id.is_none(),
        })
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn get(&self, id: Uuid) -> Result<User, UserError> {
        self.store.get_user(id).await?.ok_or(UserError::NotFound(id))
    }

    async fn create(&self, form: UserForm) -> Result<User, UserError> {
        let check = self.check(form, None).await?;
        let new_user = validate_new_user(&check).map_err(UserError::Validation)?;

        let user = self.store.add_user(&new_user, &self.security).await?;
        info!(user_id = %user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    async fn update(&self, id: Uuid, form: UserForm) -> Result<User, UserError> {
        self.get(id).await?;

        let check = self.check(form, Some(id)).await?;
        let changes = validate_user_changes(&check).map_err(UserError::Validation)?;

        let user = self
            .store
            .update_user(id, &changes, &self.security)
            .await?
            .ok_or(UserError::NotFound(id))?;

        info!(
            user_id = %user.id,
            password_changed = changes.password.is_some(),
            "User updated"
        );
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        if self.store.remove_user(id).await? {
            info!(user_id = %id, "User deleted");
            Ok(())
        } else {
            Err(UserError::NotFound(id))
        }
    }

    async fn set_admin(&self, username: &str, admin: bool) -> Result<(), UserError> {
        if self.store.set_user_admin(username, admin).await? {
            info!(username, admin, "Admin flag changed");
            Ok(())
        } else {
            Err(UserError::UnknownUsername(username.to_string()))
        }
    }
}
