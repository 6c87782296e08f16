use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::{BLANK, Rule, TAKEN, ValidationErrors, is_blank, loose_string, run_rules, squish};
use crate::models::{NewUser, User, UserChanges};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "loose_string", skip_serializing)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "loose_string", skip_serializing)]
    pub password_confirmation: Option<String>,
}

impl UserForm {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            username: Some(user.username.clone()),
            password: None,
            password_confirmation: None,
        }
    }

    /// Trims text fields and lowercases email and username. Passwords are kept
    /// verbatim; whitespace-only passwords count as absent.
    #[must_use]
    pub fn normalized(self) -> Self {
        let keep = |p: Option<String>| p.filter(|p| !p.trim().is_empty());
        Self {
            name: squish(self.name),
            email: squish(self.email).map(|e| e.to_lowercase()),
            username: squish(self.username).map(|u| u.to_lowercase()),
            password: keep(self.password),
            password_confirmation: keep(self.password_confirmation),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserCheck {
    pub form: UserForm,
    pub email_taken: bool,
    pub username_taken: bool,
    /// Signup requires a password; profile edits do not.
    pub password_required: bool,
}

fn email_format(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\S+@\S+$").expect("Invalid regex pattern defined in code"));
    re.is_match(email)
}

fn alphanumeric(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric())
}

static USER_RULES: &[Rule<UserCheck>] = &[
    Rule {
        field: "name",
        message: BLANK,
        check: |c| !is_blank(c.form.name.as_ref()),
    },
    Rule {
        field: "email",
        message: BLANK,
        check: |c| !is_blank(c.form.email.as_ref()),
    },
    Rule {
        field: "email",
        message: "is invalid",
        check: |c| c.form.email.as_deref().is_none_or(email_format),
    },
    Rule {
        field: "email",
        message: TAKEN,
        check: |c| !c.email_taken,
    },
    Rule {
        field: "username",
        message: BLANK,
        check: |c| !is_blank(c.form.username.as_ref()),
    },
    Rule {
        field: "username",
        message: "only allows letters and numbers",
        check: |c| c.form.username.as_deref().is_none_or(alphanumeric),
    },
    Rule {
        field: "username",
        message: TAKEN,
        check: |c| !c.username_taken,
    },
    Rule {
        field: "password",
        message: BLANK,
        check: |c| !c.password_required || !is_blank(c.form.password.as_ref()),
    },
    Rule {
        field: "password",
        message: "is too short (minimum is 6 characters)",
        check: |c| {
            c.form
                .password
                .as_deref()
                .is_none_or(|p| p.chars().count() >= MIN_PASSWORD_LENGTH)
        },
    },
    Rule {
        field: "password_confirmation",
        message: "doesn't match Password",
        check: |c| match (&c.form.password, &c.form.password_confirmation) {
            (Some(password), Some(confirmation)) => password == confirmation,
            (None, Some(_)) => false,
            _ => true,
        },
    },
];

/// # Errors
///
/// Returns the field messages when any rule fails.
pub fn validate_new_user(check: &UserCheck) -> Result<NewUser, ValidationErrors> {
    run_rules(check, USER_RULES)?;

    let form = &check.form;
    let user = (|| {
        Some(NewUser {
            name: form.name.clone()?,
            email: form.email.clone()?,
            username: form.username.clone()?,
            password: form.password.clone()?,
        })
    })();

    user.ok_or_else(|| ValidationErrors::single("password", BLANK))
}

/// # Errors
///
/// Returns the field messages when any rule fails.
pub fn validate_user_changes(check: &UserCheck) -> Result<UserChanges, ValidationErrors> {
    run_rules(check, USER_RULES)?;

    let form = &check.form;
    let changes = (|| {
        Some(UserChanges {
            name: form.name.clone()?,
            email: form.email.clone()?,
            username: form.username.clone()?,
            password: form.password.clone(),
        })
    })();

    changes.ok_or_else(|| ValidationErrors::single("base", "is invalid"))
}
