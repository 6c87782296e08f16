use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{prelude::*, reviews};
use crate::models::{Review, ReviewInput};

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            movie_id: model.movie_id,
            name: model.name,
            comment: model.comment,
            stars: model.stars,
            created_at: model.created_at,
        }
    }
}

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Newest first.
    pub async fn list_for_movie(&self, movie_id: i32) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .filter(reviews::Column::MovieId.eq(movie_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list reviews for movie")?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn insert(&self, movie_id: i32, input: &ReviewInput) -> Result<Review> {
        let active = reviews::ActiveModel {
            movie_id: Set(movie_id),
            name: Set(input.name.clone()),
            comment: Set(input.comment.clone()),
            stars: Set(input.stars),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert review")?;

        Ok(Review::from(model))
    }
}
