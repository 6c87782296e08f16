pub mod image;
pub use image::ImageService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod movie_service;
pub mod movie_service_impl;
pub use movie_service::{MovieDetails, MovieError, MovieService};
pub use movie_service_impl::SeaOrmMovieService;

pub mod review_service;
pub mod review_service_impl;
pub use review_service::{ReviewError, ReviewService};
pub use review_service_impl::SeaOrmReviewService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
