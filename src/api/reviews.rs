use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MovieDetailDto, MovieDto, ReviewFormDto, SeeOther};
use crate::api::validation::parse_movie_id;
use crate::validation::ReviewForm;

pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<Json<ApiResponse<MovieDetailDto>>, ApiError> {
    let movie_id = parse_movie_id(&movie_id)?;
    let details = state.reviews().list_for_movie(movie_id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

pub async fn new_review(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<Json<ApiResponse<ReviewFormDto>>, ApiError> {
    let movie_id = parse_movie_id(&movie_id)?;
    let movie = state.movies().get(movie_id).await?;

    Ok(Json(ApiResponse::success(ReviewFormDto {
        movie: MovieDto::from(&movie),
        form: ReviewForm::default(),
    })))
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Json(form): Json<ReviewForm>,
) -> Result<SeeOther, ApiError> {
    let movie_id = parse_movie_id(&movie_id)?;

    state
        .reviews()
        .create(movie_id, form.clone())
        .await
        .map_err(|e| ApiError::from(e).with_form(&form))?;

    Ok(SeeOther::notice(
        format!("/movies/{movie_id}/reviews"),
        "Thanks for your review!",
    ))
}
