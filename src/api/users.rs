use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, RequestContext, SeeOther, UserDto, UserFormDto};
use crate::api::validation::parse_user_id;
use crate::validation::UserForm;

pub async fn new_user() -> Json<ApiResponse<UserFormDto>> {
    Json(ApiResponse::success(UserFormDto {
        id: None,
        form: UserForm::default(),
    }))
}

/// Signing up also signs the new user in.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(form): Json<UserForm>,
) -> Result<SeeOther, ApiError> {
    let user = state
        .users()
        .create(form.clone())
        .await
        .map_err(|e| ApiError::from(e).with_form(&form))?;

    ctx.sign_in(user.id).await?;
    Ok(SeeOther::notice(
        format!("/users/{}", user.id),
        "Thanks for signing up!",
    ))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    ctx.require_signed_in().await?;
    let users = state.users().list().await?;
    Ok(Json(ApiResponse::success(users)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    ctx.require_signed_in().await?;
    let id = parse_user_id(&id)?;
    let user = state.users().get(id).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn edit_user(
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserFormDto>>, ApiError> {
    ctx.require_signed_in().await?;
    let user = ctx.require_owner(parse_user_id(&id)?).await?;
    Ok(Json(ApiResponse::success(UserFormDto {
        id: Some(user.id),
        form: UserForm::from_user(user),
    })))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(form): Json<UserForm>,
) -> Result<SeeOther, ApiError> {
    ctx.require_signed_in().await?;
    let id = parse_user_id(&id)?;
    ctx.require_owner(id).await?;

    let user = state
        .users()
        .update(id, form.clone())
        .await
        .map_err(|e| ApiError::from(e).with_form(&form))?;

    Ok(SeeOther::notice(
        format!("/users/{}", user.id),
        "Account successfully updated!",
    ))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<SeeOther, ApiError> {
    ctx.require_signed_in().await?;
    let id = parse_user_id(&id)?;
    ctx.require_owner(id).await?;

    state.users().delete(id).await?;
    ctx.sign_out().await?;

    Ok(SeeOther::notice("/", "Account successfully deleted!"))
}
