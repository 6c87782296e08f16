//! Domain service for the movie catalog.
//!
//! Listing, lookup and admin CRUD. Writes run the movie validator first and
//! never persist a record that fails it.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Catalog, Movie, Review};
use crate::validation::{MovieForm, ValidationErrors};

/// Errors specific to movie operations.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A movie with its reviews, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    pub movie: Movie,
    pub reviews: Vec<Review>,
    pub average_rating: f64,
}

impl MovieDetails {
    #[must_use]
    pub fn new(movie: Movie, reviews: Vec<Review>) -> Self {
        let average_rating = movie.average_rating(&reviews);
        Self {
            movie,
            reviews,
            average_rating,
        }
    }
}

#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    async fn list(&self, catalog: Catalog) -> Result<Vec<Movie>, MovieError>;

    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] for an unknown id.
    async fn get(&self, id: i32) -> Result<Movie, MovieError>;

    async fn get_with_reviews(&self, id: i32) -> Result<MovieDetails, MovieError>;

    /// # Errors
    ///
    /// Returns [`MovieError::Validation`] if the form fails any movie rule.
    async fn create(&self, form: MovieForm) -> Result<Movie, MovieError>;

    async fn update(&self, id: i32, form: MovieForm) -> Result<Movie, MovieError>;

    /// Removes the movie and every review of it.
    async fn delete(&self, id: i32) -> Result<(), MovieError>;
}
