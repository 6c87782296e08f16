use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::{
    ApiError, ApiResponse, AppState, MovieDetailDto, MovieDto, MovieFormDto, RequestContext,
    SeeOther,
};
use crate::api::validation::parse_movie_id;
use crate::models::Catalog;
use crate::validation::MovieForm;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub filter: Catalog,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<MovieDto>>>, ApiError> {
    let movies = state.movies().list(query.filter).await?;
    let dtos = movies.iter().map(MovieDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MovieDetailDto>>, ApiError> {
    let id = parse_movie_id(&id)?;
    let details = state.movies().get_with_reviews(id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

pub async fn new_movie(ctx: RequestContext) -> Result<Json<ApiResponse<MovieFormDto>>, ApiError> {
    ctx.require_admin().await?;
    Ok(Json(ApiResponse::success(MovieFormDto::new(
        None,
        MovieForm::blank(),
    ))))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(form): Json<MovieForm>,
) -> Result<SeeOther, ApiError> {
    ctx.require_admin().await?;

    let movie = state
        .movies()
        .create(form.clone())
        .await
        .map_err(|e| ApiError::from(e).with_form(&form))?;

    info!(movie_id = movie.id, title = %movie.title, "Movie created");
    Ok(SeeOther::notice(
        format!("/movies/{}", movie.id),
        "Movie successfully created!",
    ))
}

pub async fn edit_movie(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MovieFormDto>>, ApiError> {
    ctx.require_admin().await?;
    let id = parse_movie_id(&id)?;

    let movie = state.movies().get(id).await?;
    Ok(Json(ApiResponse::success(MovieFormDto::new(
        Some(movie.id),
        MovieForm::from_movie(&movie),
    ))))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(form): Json<MovieForm>,
) -> Result<SeeOther, ApiError> {
    ctx.require_admin().await?;
    let id = parse_movie_id(&id)?;

    let movie = state
        .movies()
        .update(id, form.clone())
        .await
        .map_err(|e| ApiError::from(e).with_form(&form))?;

    info!(movie_id = movie.id, "Movie updated");
    Ok(SeeOther::notice(
        format!("/movies/{}", movie.id),
        "Movie successfully updated!",
    ))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<SeeOther, ApiError> {
    ctx.require_admin().await?;
    let id = parse_movie_id(&id)?;

    state.movies().delete(id).await?;

    info!(movie_id = id, "Movie deleted");
    Ok(SeeOther::notice("/movies", "Movie successfully deleted!"))
}
