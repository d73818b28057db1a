//! UserService and request validation.

mod users;
mod validation;
pub use users::UserService;
pub use validation::{RequestValidator, MAX_AGE, MIN_AGE};
