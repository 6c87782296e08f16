use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{movies, prelude::*, reviews};
use crate::models::movie::{FLOP_THRESHOLD, HIT_THRESHOLD};
use crate::models::{Catalog, Movie, MovieInput};

const RECENT_LIMIT: u64 = 5;

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movies::Model) -> Result<Movie> {
        let rating = model
            .rating
            .parse()
            .with_context(|| format!("Movie {} has an invalid rating", model.id))?;

        Ok(Movie {
            id: model.id,
            title: model.title,
            director: model.director,
            description: model.description,
            released_on: model.released_on,
            duration: model.duration,
            rating,
            total_gross: model.total_gross,
            image_file_name: model.image_file_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn map_models(models: Vec<movies::Model>) -> Result<Vec<Movie>> {
        models.into_iter().map(Self::map_model).collect()
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let model = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie by ID")?;

        model.map(Self::map_model).transpose()
    }

    pub async fn list(&self, catalog: Catalog, today: NaiveDate) -> Result<Vec<Movie>> {
        let released = movies::Column::ReleasedOn.lte(today);

        let query = match catalog {
            Catalog::Released => Movies::find()
                .filter(released)
                .order_by_desc(movies::Column::ReleasedOn)
                .order_by_asc(movies::Column::Id),
            Catalog::Upcoming => Movies::find()
                .filter(movies::Column::ReleasedOn.gt(today))
                .order_by_asc(movies::Column::ReleasedOn)
                .order_by_asc(movies::Column::Id),
            Catalog::Recent => Movies::find()
                .filter(released)
                .order_by_desc(movies::Column::ReleasedOn)
                .order_by_asc(movies::Column::Id)
                .limit(RECENT_LIMIT),
            Catalog::Hits => Movies::find()
                .filter(released)
                .filter(movies::Column::TotalGross.gte(HIT_THRESHOLD))
                .order_by_desc(movies::Column::TotalGross)
                .order_by_asc(movies::Column::Id),
            Catalog::Flops => Movies::find()
                .filter(released)
                .filter(
                    Condition::any()
                        .add(movies::Column::TotalGross.is_null())
                        .add(movies::Column::TotalGross.lt(FLOP_THRESHOLD)),
                )
                .order_by_asc(movies::Column::TotalGross)
                .order_by_asc(movies::Column::Id),
        };

        let models = query
            .all(&self.conn)
            .await
            .with_context(|| format!("Failed to list {catalog:?} movies"))?;

        Self::map_models(models)
    }

    /// Whether another movie already has this (title, director) pair.
    pub async fn title_taken(
        &self,
        title: &str,
        director: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        let mut query = Movies::find()
            .filter(movies::Column::Title.eq(title))
            .filter(movies::Column::Director.eq(director));

        if let Some(id) = exclude_id {
            query = query.filter(movies::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check movie title uniqueness")?;

        Ok(count > 0)
    }

    pub async fn insert(&self, input: &MovieInput) -> Result<Movie> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = movies::ActiveModel {
            title: Set(input.title.clone()),
            director: Set(input.director.clone()),
            description: Set(input.description.clone()),
            released_on: Set(input.released_on),
            duration: Set(input.duration),
            rating: Set(input.rating.as_str().to_string()),
            total_gross: Set(input.total_gross),
            image_file_name: Set(input.image_file_name.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert movie")?;

        info!(movie_id = model.id, "Created movie: {}", model.title);
        Self::map_model(model)
    }

    pub async fn update(&self, id: i32, input: &MovieInput) -> Result<Option<Movie>> {
        let Some(model) = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie for update")?
        else {
            return Ok(None);
        };

        let mut active: movies::ActiveModel = model.into();
        active.title = Set(input.title.clone());
        active.director = Set(input.director.clone());
        active.description = Set(input.description.clone());
        active.released_on = Set(input.released_on);
        active.duration = Set(input.duration);
        active.rating = Set(input.rating.as_str().to_string());
        active.total_gross = Set(input.total_gross);
        active.image_file_name = Set(input.image_file_name.clone());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update movie")?;

        info!(movie_id = model.id, "Updated movie: {}", model.title);
        Self::map_model(model).map(Some)
    }

    /// Deletes the movie's reviews, then the movie, in one transaction.
    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let reviews_removed = Reviews::delete_many()
            .filter(reviews::Column::MovieId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        let result = Movies::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!(
                movie_id = id,
                reviews_removed, "Removed movie and its reviews"
            );
        }
        Ok(removed)
    }
}
