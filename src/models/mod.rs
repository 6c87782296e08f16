pub mod movie;
pub mod review;
pub mod user;

pub use movie::{Catalog, Movie, MovieInput, MovieRating};
pub use review::{Review, ReviewInput};
pub use user::{NewUser, User, UserChanges};
