//! Domain service for movie reviews. Reviews are open to every visitor and
//! are only ever created, never edited.

use thiserror::Error;

use crate::models::Review;
use crate::services::movie_service::MovieDetails;
use crate::validation::{ReviewForm, ValidationErrors};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Movie not found: {0}")]
    MovieNotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    async fn list_for_movie(&self, movie_id: i32) -> Result<MovieDetails, ReviewError>;

    /// # Errors
    ///
    /// Returns [`ReviewError::MovieNotFound`] before validating when the movie
    /// does not exist, and [`ReviewError::Validation`] for a bad form.
    async fn create(&self, movie_id: i32, form: ReviewForm) -> Result<Review, ReviewError>;
}
