//! `SeaORM` implementation of the `MovieService` trait.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::db::Store;
use crate::models::{Catalog, Movie};
use crate::services::ImageService;
use crate::services::movie_service::{MovieDetails, MovieError, MovieService};
use crate::validation::{MovieCheck, MovieForm, validate_movie};

pub struct SeaOrmMovieService {
    store: Store,
    images: Arc<ImageService>,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store, images: Arc<ImageService>) -> Self {
        Self { store, images }
    }

    /// Gathers the store-derived facts and runs the movie rules.
    async fn check(
        &self,
        form: MovieForm,
        own_id: Option<i32>,
    ) -> Result<crate::models::MovieInput, MovieError> {
        let form = form.normalized();

        let title_taken = match (form.title.as_deref(), form.director.as_deref()) {
            (Some(title), Some(director)) => {
                self.store
                    .movie_title_taken(title, director, own_id)
                    .await?
            }
            _ => false,
        };

        let image_present = match form.image_file_name.as_deref() {
            Some(name) => self.images.exists(name).await,
            None => false,
        };

        let check = MovieCheck {
            form,
            title_taken,
            image_present,
            today: Utc::now().date_naive(),
        };

        validate_movie(&check).map_err(MovieError::Validation)
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list(&self, catalog: Catalog) -> Result<Vec<Movie>, MovieError> {
        Ok(self
            .store
            .list_movies(catalog, Utc::now().date_naive())
            .await?)
    }

    async fn get(&self, id: i32) -> Result<Movie, MovieError> {
        self.store
            .get_movie(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn get_with_reviews(&self, id: i32) -> Result<MovieDetails, MovieError> {
        let movie = self.get(id).await?;
        let reviews = self.store.get_reviews_for_movie(id).await?;
        Ok(MovieDetails::new(movie, reviews))
    }

    async fn create(&self, form: MovieForm) -> Result<Movie, MovieError> {
        let input = self.check(form, None).await?;
        Ok(self.store.add_movie(&input).await?)
    }

    async fn update(&self, id: i32, form: MovieForm) -> Result<Movie, MovieError> {
        // 404 takes precedence over validation errors
        self.get(id).await?;

        let input = self.check(form, Some(id)).await?;
        self.store
            .update_movie(id, &input)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), MovieError> {
        if self.store.remove_movie(id).await? {
            Ok(())
        } else {
            Err(MovieError::NotFound(id))
        }
    }
}
