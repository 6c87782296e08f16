use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::models::{
    Catalog, Movie, MovieInput, NewUser, Review, ReviewInput, User, UserChanges,
};

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if in_memory {
            // Every SQLite connection to `:memory:` is its own database, so the
            // pool is pinned to one long-lived connection.
            opt.max_connections(1)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(60 * 60 * 24))
                .max_lifetime(Duration::from_secs(60 * 60 * 24));
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // Movies

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn list_movies(&self, catalog: Catalog, today: NaiveDate) -> Result<Vec<Movie>> {
        self.movie_repo().list(catalog, today).await
    }

    pub async fn movie_title_taken(
        &self,
        title: &str,
        director: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        self.movie_repo()
            .title_taken(title, director, exclude_id)
            .await
    }

    pub async fn add_movie(&self, input: &MovieInput) -> Result<Movie> {
        self.movie_repo().insert(input).await
    }

    pub async fn update_movie(&self, id: i32, input: &MovieInput) -> Result<Option<Movie>> {
        self.movie_repo().update(id, input).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    // Reviews

    pub async fn get_reviews_for_movie(&self, movie_id: i32) -> Result<Vec<Review>> {
        self.review_repo().list_for_movie(movie_id).await
    }

    pub async fn add_review(&self, movie_id: i32, input: &ReviewInput) -> Result<Review> {
        self.review_repo().insert(movie_id, input).await
    }

    // Users

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> Result<bool> {
        self.user_repo().email_taken(email, exclude).await
    }

    pub async fn username_taken(&self, username: &str, exclude: Option<Uuid>) -> Result<bool> {
        self.user_repo().username_taken(username, exclude).await
    }

    pub async fn verify_user_password(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<Uuid>> {
        self.user_repo().verify_password(identifier, password).await
    }

    pub async fn add_user(&self, new_user: &NewUser, security: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, security).await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        changes: &UserChanges,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().update(id, changes, security).await
    }

    pub async fn remove_user(&self, id: Uuid) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn set_user_admin(&self, username: &str, admin: bool) -> Result<bool> {
        self.user_repo().set_admin(username, admin).await
    }
}
