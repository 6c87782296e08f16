use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, RequestContext, SeeOther, SignInForm};

pub async fn new_session() -> Json<ApiResponse<SignInForm>> {
    Json(ApiResponse::success(SignInForm::default()))
}

/// POST /session
///
/// Accepts either the email or the username. Any failure gets the same
/// generic answer so callers cannot learn which accounts exist.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(form): Json<SignInForm>,
) -> Result<SeeOther, ApiError> {
    let user_id = state
        .auth()
        .authenticate(form.email_or_username.trim(), &form.password)
        .await
        .map_err(|e| ApiError::from(e).with_form(&form))?;

    let user = state
        .auth()
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", user_id))?;

    let intended_url = ctx.sign_in(user.id).await?;
    let location = intended_url.unwrap_or_else(|| format!("/users/{}", user.id));

    Ok(SeeOther::notice(
        location,
        format!("Welcome back, {}!", user.name),
    ))
}

pub async fn delete_session(ctx: RequestContext) -> Result<SeeOther, ApiError> {
    ctx.sign_out().await?;
    Ok(SeeOther::notice("/", "You're now signed out!"))
}
