//! HTTP handlers for users.

pub mod users;
pub use users::*;
