//! User directory: REST service for users and departments backed by PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod sanitize;
pub mod seed;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreKind};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, docs_routes, user_routes};
pub use sanitize::sanitize;
pub use seed::seed_initial_data;
pub use service::UserService;
pub use state::AppState;
pub use store::ensure_database_exists;
