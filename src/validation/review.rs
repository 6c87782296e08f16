use serde::{Deserialize, Serialize};

use super::{BLANK, Rule, ValidationErrors, is_blank, loose_string, run_rules, squish};
use crate::models::ReviewInput;

pub const MIN_COMMENT_LENGTH: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewForm {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub stars: Option<String>,
}

impl ReviewForm {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: squish(self.name),
            comment: squish(self.comment),
            stars: squish(self.stars),
        }
    }

    #[must_use]
    pub fn parsed_stars(&self) -> Option<i32> {
        self.stars
            .as_deref()?
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|s| (1..=5).contains(s))
    }
}

static REVIEW_RULES: &[Rule<ReviewForm>] = &[
    Rule {
        field: "name",
        message: BLANK,
        check: |r| !is_blank(r.name.as_ref()),
    },
    Rule {
        field: "comment",
        message: "is too short (minimum is 4 characters)",
        check: |r| {
            r.comment
                .as_deref()
                .is_some_and(|c| c.chars().count() >= MIN_COMMENT_LENGTH)
        },
    },
    Rule {
        field: "stars",
        message: "must be between 1 and 5",
        check: |r| r.parsed_stars().is_some(),
    },
];

/// # Errors
///
/// Returns the field messages when any rule fails.
pub fn validate_review(form: &ReviewForm) -> Result<ReviewInput, ValidationErrors> {
    run_rules(form, REVIEW_RULES)?;

    let input = (|| {
        Some(ReviewInput {
            name: form.name.clone()?,
            comment: form.comment.clone()?,
            stars: form.parsed_stars()?,
        })
    })();

    input.ok_or_else(|| ValidationErrors::single("base", "is invalid"))
}
