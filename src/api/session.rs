use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tower_sessions::Session;
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::models::User;
use crate::services::AuthService;

pub const USER_ID_KEY: &str = "user_id";
pub const INTENDED_URL_KEY: &str = "intended_url";

/// Per-request view of who is signed in.
///
/// The current user is looked up at most once per request and cached here, so
/// handlers and guards can ask for it repeatedly without extra queries.
pub struct RequestContext {
    session: Session,
    auth: Arc<dyn AuthService>,
    requested_url: String,
    current_user: OnceCell<Option<User>>,
}

impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let requested_url = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());

        Ok(Self {
            session,
            auth: state.shared.auth_service.clone(),
            requested_url,
            current_user: OnceCell::new(),
        })
    }
}

impl RequestContext {
    pub async fn current_user(&self) -> Result<Option<&User>, ApiError> {
        let user = self
            .current_user
            .get_or_try_init(|| self.load_current_user())
            .await?;
        Ok(user.as_ref())
    }

    async fn load_current_user(&self) -> Result<Option<User>, ApiError> {
        let Some(user_id) = self.session.get::<Uuid>(USER_ID_KEY).await? else {
            return Ok(None);
        };

        let user = self.auth.find_user(user_id).await?;
        match &user {
            Some(user) => {
                tracing::Span::current().record("user_id", tracing::field::display(user.id));
            }
            // Account is gone; drop the stale id.
            None => {
                self.session.remove::<Uuid>(USER_ID_KEY).await?;
            }
        }
        Ok(user)
    }

    /// Remembers the requested URL so sign-in can return there.
    pub async fn require_signed_in(&self) -> Result<&User, ApiError> {
        if let Some(user) = self.current_user().await? {
            return Ok(user);
        }

        self.session
            .insert(INTENDED_URL_KEY, &self.requested_url)
            .await?;
        Err(ApiError::sign_in_required())
    }

    pub async fn require_admin(&self) -> Result<&User, ApiError> {
        let user = self.require_signed_in().await?;
        if user.admin {
            Ok(user)
        } else {
            Err(ApiError::access_denied())
        }
    }

    pub async fn require_owner(&self, user_id: Uuid) -> Result<&User, ApiError> {
        let user = self.require_signed_in().await?;
        if user.id == user_id {
            Ok(user)
        } else {
            Err(ApiError::access_denied())
        }
    }

    /// Starts an authenticated session and hands back the remembered target, if any.
    pub async fn sign_in(&self, user_id: Uuid) -> Result<Option<String>, ApiError> {
        let intended_url = self.session.remove::<String>(INTENDED_URL_KEY).await?;
        self.session.cycle_id().await?;
        self.session.insert(USER_ID_KEY, user_id).await?;
        Ok(intended_url)
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.session.flush().await?;
        Ok(())
    }
}
