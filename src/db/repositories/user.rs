use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::OnceLock;
use tokio::task;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::entities::users;
use crate::models::{NewUser, User, UserChanges};

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            username: model.username,
            admin: model.admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    /// Matches `identifier` against email or username, case-insensitively.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<users::Model>> {
        let identifier = identifier.trim().to_lowercase();

        users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Email.eq(identifier.as_str()))
                    .add(users::Column::Username.eq(identifier.as_str())),
            )
            .one(&self.conn)
            .await
            .context("Failed to query user by identifier")
    }

    pub async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> Result<bool> {
        self.column_taken(users::Column::Email, email, exclude).await
    }

    pub async fn username_taken(&self, username: &str, exclude: Option<Uuid>) -> Result<bool> {
        self.column_taken(users::Column::Username, username, exclude)
            .await
    }

    async fn column_taken(
        &self,
        column: users::Column,
        value: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool> {
        let mut query = users::Entity::find().filter(column.eq(value.to_lowercase()));

        if let Some(id) = exclude {
            query = query.filter(users::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check user uniqueness")?;

        Ok(count > 0)
    }

    /// Verify a password for the user matching `identifier`.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    ///
    /// Unknown identifiers are checked against a placeholder hash so the
    /// response time does not reveal whether an account exists.
    pub async fn verify_password(&self, identifier: &str, password: &str) -> Result<Option<Uuid>> {
        let (user_id, stored_hash) = match self.find_by_identifier(identifier).await? {
            Some(user) => (Some(user.id), Some(user.password_hash)),
            None => (None, None),
        };
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let password_hash = match stored_hash {
                Some(hash) => hash,
                None => placeholder_hash()?.to_string(),
            };
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(user_id.filter(|_| is_valid))
    }

    pub async fn create(&self, new_user: &NewUser, security: &SecurityConfig) -> Result<User> {
        let password = new_user.password.clone();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(new_user.name.clone()),
            email: Set(new_user.email.to_lowercase()),
            username: Set(new_user.username.to_lowercase()),
            password_hash: Set(password_hash),
            admin: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(model))
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &UserChanges,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        let Some(user) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.name = Set(changes.name.clone());
        active.email = Set(changes.email.to_lowercase());
        active.username = Set(changes.username.to_lowercase());

        if let Some(password) = changes.password.clone() {
            let security = security.clone();
            let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
                .await
                .context("Password hashing task panicked")??;
            active.password_hash = Set(new_hash);
        }

        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&self.conn).await?;

        Ok(Some(User::from(model)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }

    /// Sets the admin flag for `username`. Returns `false` if no such user.
    pub async fn set_admin(&self, username: &str, admin: bool) -> Result<bool> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Admin, sea_orm::sea_query::Expr::value(admin))
            .col_expr(
                users::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(users::Column::Username.eq(username.trim().to_lowercase()))
            .exec(&self.conn)
            .await
            .context("Failed to update admin flag")?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
static PLACEHOLDER_HASH: OnceLock<String> = OnceLock::new();

/// Hash of a random secret, verified against when no account matches.
fn placeholder_hash() -> Result<&'static str> {
    if let Some(hash) = PLACEHOLDER_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password(&Uuid::new_v4().to_string(), None)?;
    Ok(PLACEHOLDER_HASH.get_or_init(|| hash))
}

pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
