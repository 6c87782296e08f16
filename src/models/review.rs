use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i32,
    pub movie_id: i32,
    pub name: String,
    pub comment: String,
    pub stars: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub name: String,
    pub comment: String,
    pub stars: i32,
}
