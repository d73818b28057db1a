//! Request body validation for users.

use crate::error::AppError;
use crate::model::NewUser;
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 150;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern"));

pub struct RequestValidator;

impl RequestValidator {
    /// Check every rule and report all violations at once.
    pub fn validate_user(body: &NewUser) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if body.name.trim().is_empty() {
            errors.push("name is mandatory".to_string());
        }
        if body.age < MIN_AGE {
            errors.push(format!("age should not be less than {}", MIN_AGE));
        }
        if body.age > MAX_AGE {
            errors.push(format!("age should not be greater than {}", MAX_AGE));
        }
        if body.email.trim().is_empty() {
            errors.push("email is mandatory".to_string());
        } else if !EMAIL.is_match(&body.email) {
            errors.push("email should be valid".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}
