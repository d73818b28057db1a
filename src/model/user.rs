//! User records and the request body used to create or replace them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of the `users` table. `id` is `None` until the store assigns one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub age: i32,
    pub salary: f64,
    pub email: String,
}

/// Body of `POST /users` and `PUT /users/{id}`. Missing fields fall back to
/// empty / zero so that validation can report them instead of a parse error.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub email: String,
}

impl NewUser {
    pub fn into_user(self) -> User {
        User {
            id: None,
            name: self.name,
            age: self.age,
            salary: self.salary,
            email: self.email,
        }
    }
}

impl User {
    /// Overwrite the mutable fields; `id` is kept.
    pub fn apply(&mut self, patch: NewUser) {
        self.age = patch.age;
        self.salary = patch.salary;
        self.name = patch.name;
        self.email = patch.email;
    }
}

/// Example-match input. Fields left `None` take no part in matching.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserProbe {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserProbe {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Case-insensitive: email equals, or name starts with. Any supplied predicate suffices.
    pub fn matches(&self, user: &User) -> bool {
        let email_hit = self
            .email
            .as_deref()
            .is_some_and(|e| user.email.to_lowercase() == e.to_lowercase());
        let name_hit = self
            .name
            .as_deref()
            .is_some_and(|n| user.name.to_lowercase().starts_with(&n.to_lowercase()));
        email_hit || name_hit
    }
}
