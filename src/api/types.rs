use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::models::{Movie, MovieRating, Review, User};
use crate::services::MovieDetails;
use crate::validation::{MovieForm, ReviewForm, UserForm, ValidationErrors};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body of a 422 response: the messages plus the submitted values, so the
/// client can show the form again.
#[derive(Debug, Serialize)]
pub struct FormErrorResponse {
    pub success: bool,
    pub error: String,
    pub errors: ValidationErrors,
    pub form: serde_json::Value,
}

/// `303 See Other` carrying a notice (success) or an alert (refusal).
#[derive(Debug, Serialize)]
pub struct SeeOther {
    pub success: bool,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

impl SeeOther {
    pub fn notice(location: impl Into<String>, notice: impl Into<String>) -> Self {
        Self {
            success: true,
            location: location.into(),
            notice: Some(notice.into()),
            alert: None,
        }
    }

    pub fn alert(location: impl Into<String>, alert: impl Into<String>) -> Self {
        Self {
            success: false,
            location: location.into(),
            notice: None,
            alert: Some(alert.into()),
        }
    }
}

impl IntoResponse for SeeOther {
    fn into_response(self) -> Response {
        let location = HeaderValue::from_str(&self.location)
            .unwrap_or_else(|_| HeaderValue::from_static("/"));

        (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, location)],
            Json(self),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub description: Option<String>,
    pub released_on: String,
    pub duration: i32,
    pub rating: MovieRating,
    pub total_gross: Option<i64>,
    pub image_file_name: String,
    pub image_url: String,
    pub released: bool,
    pub flop: bool,
    pub hit: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Movie> for MovieDto {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            director: movie.director.clone(),
            description: movie.description.clone(),
            released_on: movie.released_on.format("%Y-%m-%d").to_string(),
            duration: movie.duration,
            rating: movie.rating,
            total_gross: movie.total_gross,
            image_file_name: movie.image_file_name.clone(),
            image_url: format!("/images/{}", movie.image_file_name),
            released: movie.is_released(),
            flop: movie.is_flop(),
            hit: movie.is_hit(),
            created_at: movie.created_at.clone(),
            updated_at: movie.updated_at.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailDto {
    pub movie: MovieDto,
    pub average_rating: f64,
    pub review_count: usize,
    pub reviews: Vec<Review>,
}

impl From<MovieDetails> for MovieDetailDto {
    fn from(details: MovieDetails) -> Self {
        Self {
            movie: MovieDto::from(&details.movie),
            average_rating: details.average_rating,
            review_count: details.reviews.len(),
            reviews: details.reviews,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieFormDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub form: MovieForm,
    pub ratings: Vec<&'static str>,
}

impl MovieFormDto {
    #[must_use]
    pub fn new(id: Option<i32>, form: MovieForm) -> Self {
        Self {
            id,
            form,
            ratings: MovieRating::ALL.iter().map(MovieRating::as_str).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewFormDto {
    pub movie: MovieDto,
    pub form: ReviewForm,
}

#[derive(Debug, Serialize)]
pub struct UserFormDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<uuid::Uuid>,
    pub form: UserForm,
}

pub type UserDto = User;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email_or_username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}
