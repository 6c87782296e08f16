//! `SeaORM` implementation of the `ReviewService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::models::Review;
use crate::services::movie_service::MovieDetails;
use crate::services::review_service::{ReviewError, ReviewService};
use crate::validation::{ReviewForm, validate_review};

pub struct SeaOrmReviewService {
    store: Store,
}

impl SeaOrmReviewService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn ensure_movie(&self, movie_id: i32) -> Result<crate::models::Movie, ReviewError> {
        self.store
            .get_movie(movie_id)
            .await?
            .ok_or(ReviewError::MovieNotFound(movie_id))
    }
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn list_for_movie(&self, movie_id: i32) -> Result<MovieDetails, ReviewError> {
        let movie = self.ensure_movie(movie_id).await?;
        let reviews = self.store.get_reviews_for_movie(movie_id).await?;
        Ok(MovieDetails::new(movie, reviews))
    }

    async fn create(&self, movie_id: i32, form: ReviewForm) -> Result<Review, ReviewError> {
        self.ensure_movie(movie_id).await?;

        let input = validate_review(&form.normalized()).map_err(ReviewError::Validation)?;
        let review = self.store.add_review(movie_id, &input).await?;

        info!(movie_id, review_id = review.id, stars = review.stars, "Review added");
        Ok(review)
    }
}
