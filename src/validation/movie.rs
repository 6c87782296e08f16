use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::{
    BLANK, NOT_A_NUMBER, Rule, TAKEN, ValidationErrors, is_blank, loose_string, run_rules, squish,
};
use crate::models::{Movie, MovieInput, MovieRating};

pub const MAX_DURATION: i64 = 500;

/// Submitted movie fields, kept as raw text until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieForm {
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub released_on: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub total_gross: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub image_file_name: Option<String>,
}

impl MovieForm {
    #[must_use]
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: Some(movie.title.clone()),
            director: Some(movie.director.clone()),
            description: movie.description.clone(),
            released_on: Some(movie.released_on.format("%Y-%m-%d").to_string()),
            duration: Some(movie.duration.to_string()),
            rating: Some(movie.rating.as_str().to_string()),
            total_gross: movie.total_gross.map(|g| g.to_string()),
            image_file_name: Some(movie.image_file_name.clone()),
        }
    }

    /// Blank form offered by the "new movie" endpoint.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            image_file_name: Some("placeholder.png".to_string()),
            ..Self::default()
        }
    }

    /// Trims every field and turns empty strings into `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: squish(self.title),
            director: squish(self.director),
            description: squish(self.description),
            released_on: squish(self.released_on),
            duration: squish(self.duration),
            rating: squish(self.rating),
            total_gross: squish(self.total_gross),
            image_file_name: squish(self.image_file_name),
        }
    }

    #[must_use]
    pub fn parsed_released_on(&self) -> Option<NaiveDate> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex pattern defined in code")
        });

        let raw = self.released_on.as_deref()?.trim();
        if !re.is_match(raw) {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    #[must_use]
    pub fn parsed_rating(&self) -> Option<MovieRating> {
        self.rating.as_deref()?.trim().parse().ok()
    }

    /// `Some(Ok(n))` for an integer, `Some(Err(()))` for anything else present.
    fn number(raw: Option<&String>) -> Option<Result<f64, ()>> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(raw.parse::<f64>().map_err(|_| ()).and_then(|n| {
            if n.is_finite() { Ok(n) } else { Err(()) }
        }))
    }

    fn integer(raw: Option<&String>) -> Option<i64> {
        raw?.trim().parse::<i64>().ok()
    }
}

/// A movie form plus the facts the rules cannot derive from the form itself.
#[derive(Debug, Clone)]
pub struct MovieCheck {
    pub form: MovieForm,
    /// Another movie already uses this (title, director) pair.
    pub title_taken: bool,
    /// The image file exists in the asset directory.
    pub image_present: bool,
    pub today: NaiveDate,
}

impl MovieCheck {
    fn released(&self) -> Option<bool> {
        self.form.parsed_released_on().map(|d| d <= self.today)
    }

    /// Absent gross counts as zero; `None` when present but not a number.
    fn gross(&self) -> Option<f64> {
        match MovieForm::number(self.form.total_gross.as_ref()) {
            None => Some(0.0),
            Some(Ok(n)) => Some(n),
            Some(Err(())) => None,
        }
    }
}

fn image_name_allowed(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)^\w+([-_]\w+)*\.(jpg|png)$").expect("Invalid regex pattern defined in code")
    });
    re.is_match(name)
}

static MOVIE_RULES: &[Rule<MovieCheck>] = &[
    Rule {
        field: "title",
        message: BLANK,
        check: |c| !is_blank(c.form.title.as_ref()),
    },
    Rule {
        field: "director",
        message: BLANK,
        check: |c| !is_blank(c.form.director.as_ref()),
    },
    Rule {
        field: "released_on",
        message: BLANK,
        check: |c| !is_blank(c.form.released_on.as_ref()),
    },
    Rule {
        field: "duration",
        message: BLANK,
        check: |c| !is_blank(c.form.duration.as_ref()),
    },
    Rule {
        field: "title",
        message: TAKEN,
        check: |c| !c.title_taken,
    },
    Rule {
        field: "released_on",
        message: "must be a valid date",
        check: |c| is_blank(c.form.released_on.as_ref()) || c.form.parsed_released_on().is_some(),
    },
    Rule {
        field: "duration",
        message: NOT_A_NUMBER,
        check: |c| !matches!(MovieForm::number(c.form.duration.as_ref()), Some(Err(()))),
    },
    Rule {
        field: "duration",
        message: "must be an integer",
        check: |c| {
            !matches!(MovieForm::number(c.form.duration.as_ref()), Some(Ok(_)))
                || MovieForm::integer(c.form.duration.as_ref()).is_some()
        },
    },
    Rule {
        field: "duration",
        message: "must be greater than 0",
        check: |c| MovieForm::integer(c.form.duration.as_ref()).is_none_or(|d| d > 0),
    },
    Rule {
        field: "duration",
        message: "must be less than or equal to 500",
        check: |c| MovieForm::integer(c.form.duration.as_ref()).is_none_or(|d| d <= MAX_DURATION),
    },
    Rule {
        field: "rating",
        message: "is not included in the list",
        check: |c| c.form.parsed_rating().is_some(),
    },
    Rule {
        field: "total_gross",
        message: NOT_A_NUMBER,
        check: |c| c.gross().is_some(),
    },
    Rule {
        field: "total_gross",
        message: "must be an integer",
        check: |c| {
            is_blank(c.form.total_gross.as_ref())
                || c.gross().is_none()
                || MovieForm::integer(c.form.total_gross.as_ref()).is_some()
        },
    },
    Rule {
        field: "total_gross",
        message: "must be greater than or equal to 0",
        check: |c| match (c.released(), c.gross()) {
            (Some(true), Some(gross)) => gross >= 0.0,
            _ => true,
        },
    },
    Rule {
        field: "total_gross",
        message: "must be 0 for unreleased movies",
        check: |c| match (c.released(), c.gross()) {
            (Some(false), Some(gross)) => gross == 0.0,
            _ => true,
        },
    },
    Rule {
        field: "image_file_name",
        message: "must be a JPG or PNG image",
        check: |c| c.form.image_file_name.as_deref().is_some_and(image_name_allowed),
    },
    Rule {
        field: "image_file_name",
        message: "must reference an existing image",
        check: |c| c.image_present,
    },
];

/// Returns `true` when `name` is safe to look up in the asset directory.
#[must_use]
pub fn is_allowed_image_name(name: &str) -> bool {
    image_name_allowed(name)
}

/// Runs the movie rules and converts the form into store input.
///
/// # Errors
///
/// Returns the field messages when any rule fails.
pub fn validate_movie(check: &MovieCheck) -> Result<MovieInput, ValidationErrors> {
    run_rules(check, MOVIE_RULES)?;

    let form = &check.form;
    let input = (|| {
        Some(MovieInput {
            title: form.title.clone()?,
            director: form.director.clone()?,
            description: form.description.clone(),
            released_on: form.parsed_released_on()?,
            duration: i32::try_from(MovieForm::integer(form.duration.as_ref())?).ok()?,
            rating: form.parsed_rating()?,
            total_gross: match form.total_gross.as_ref() {
                None => None,
                Some(raw) => Some(raw.trim().parse::<i64>().ok()?),
            },
            image_file_name: form.image_file_name.clone()?,
        })
    })();

    input.ok_or_else(|| ValidationErrors::single("base", "is invalid"))
}
