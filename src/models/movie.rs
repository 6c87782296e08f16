use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::review::Review;

/// Gross below this (or unknown) makes a movie a flop.
pub const FLOP_THRESHOLD: i64 = 225_000_000;

/// Gross at or above this makes a movie a hit.
pub const HIT_THRESHOLD: i64 = 300_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovieRating {
    #[serde(rename = "G")]
    G,
    #[serde(rename = "PG")]
    Pg,
    #[serde(rename = "PG-13")]
    Pg13,
    #[serde(rename = "R")]
    R,
    #[serde(rename = "NC-17")]
    Nc17,
}

impl MovieRating {
    pub const ALL: [Self; 5] = [Self::G, Self::Pg, Self::Pg13, Self::R, Self::Nc17];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::G => "G",
            Self::Pg => "PG",
            Self::Pg13 => "PG-13",
            Self::R => "R",
            Self::Nc17 => "NC-17",
        }
    }
}

impl fmt::Display for MovieRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieRating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown movie rating: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub description: Option<String>,
    pub released_on: NaiveDate,
    pub duration: i32,
    pub rating: MovieRating,
    pub total_gross: Option<i64>,
    pub image_file_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Movie {
    #[must_use]
    pub fn is_flop(&self) -> bool {
        self.total_gross.is_none_or(|gross| gross < FLOP_THRESHOLD)
    }

    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.total_gross.is_some_and(|gross| gross >= HIT_THRESHOLD)
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.is_released_as_of(Utc::now().date_naive())
    }

    #[must_use]
    pub fn is_released_as_of(&self, today: NaiveDate) -> bool {
        self.released_on <= today
    }

    /// Mean star value of the given reviews, `0.0` when there are none.
    #[must_use]
    pub fn average_rating(&self, reviews: &[Review]) -> f64 {
        average_stars(reviews.iter().map(|r| r.stars))
    }
}

#[must_use]
pub fn average_stars(stars: impl IntoIterator<Item = i32>) -> f64 {
    let (sum, count) = stars
        .into_iter()
        .fold((0_i64, 0_u32), |(sum, count), s| (sum + i64::from(s), count + 1));

    if count == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let sum = sum as f64;
        sum / f64::from(count)
    }
}

/// Named listings offered by the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// Released movies, newest first.
    #[default]
    Released,
    /// Not yet released, soonest first.
    Upcoming,
    /// The five most recent releases.
    Recent,
    /// Released hits, highest gross first.
    Hits,
    /// Released flops, lowest gross first.
    Flops,
}

/// Validated field values ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieInput {
    pub title: String,
    pub director: String,
    pub description: Option<String>,
    pub released_on: NaiveDate,
    pub duration: i32,
    pub rating: MovieRating,
    pub total_gross: Option<i64>,
    pub image_file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with_gross(total_gross: Option<i64>) -> Movie {
        Movie {
            id: 1,
            title: "Iron Man".to_string(),
            director: "Jon Favreau".to_string(),
            description: None,
            released_on: NaiveDate::from_ymd_opt(2008, 5, 2).unwrap(),
            duration: 126,
            rating: MovieRating::Pg13,
            total_gross,
            image_file_name: "ironman.png".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn review(stars: i32) -> Review {
        Review {
            id: 0,
            movie_id: 1,
            name: "Roger".to_string(),
            comment: "Loved it".to_string(),
            stars,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_flop_threshold_boundary() {
        assert!(movie_with_gross(Some(224_999_999)).is_flop());
        assert!(!movie_with_gross(Some(225_000_000)).is_flop());
        assert!(movie_with_gross(None).is_flop());
        assert!(movie_with_gross(Some(0)).is_flop());
    }

    #[test]
    fn test_hit_threshold() {
        assert!(movie_with_gross(Some(300_000_000)).is_hit());
        assert!(!movie_with_gross(Some(299_999_999)).is_hit());
        assert!(!movie_with_gross(None).is_hit());
    }

    #[test]
    fn test_is_released_as_of() {
        let movie = movie_with_gross(None);
        let release = movie.released_on;

        assert!(movie.is_released_as_of(release));
        assert!(movie.is_released_as_of(release.succ_opt().unwrap()));
        assert!(!movie.is_released_as_of(release.pred_opt().unwrap()));
    }

    #[test]
    fn test_average_rating() {
        let movie = movie_with_gross(None);

        assert!(movie.average_rating(&[]).abs() < f64::EPSILON);
        assert!((movie.average_rating(&[review(3), review(5)]) - 4.0).abs() < f64::EPSILON);
        assert!((movie.average_rating(&[review(1), review(2)]) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rating_round_trip_through_str() {
        for rating in MovieRating::ALL {
            assert_eq!(rating.as_str().parse::<MovieRating>().unwrap(), rating);
        }
        assert!("PG13".parse::<MovieRating>().is_err());
        assert!("g".parse::<MovieRating>().is_err());
    }

    #[test]
    fn test_rating_serde_uses_display_names() {
        let json = serde_json::to_string(&MovieRating::Nc17).unwrap();
        assert_eq!(json, "\"NC-17\"");
        let parsed: MovieRating = serde_json::from_str("\"PG-13\"").unwrap();
        assert_eq!(parsed, MovieRating::Pg13);
    }
}
