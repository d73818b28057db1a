//! Data access: repository traits per table, with PostgreSQL and in-memory backends.

mod database;
mod memory;
mod postgres;

pub use database::ensure_database_exists;
pub use memory::{MemoryDepartmentRepository, MemoryUserRepository};
pub use postgres::{PgDepartmentRepository, PgUserRepository};

use crate::error::AppError;
use crate::model::{Department, PageRequest, User, UserProbe};
use async_trait::async_trait;

/// Storage for the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the stored row.
    async fn save(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn find_all(&self) -> Result<Vec<User>, AppError>;
    async fn delete_all(&self) -> Result<(), AppError>;
    /// No-op for a user that was never saved.
    async fn delete(&self, user: &User) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    /// Users with `age >= min_age`.
    async fn find_by_age(&self, min_age: i32) -> Result<Vec<User>, AppError>;
    /// One sorted window of users.
    async fn find_all_by(&self, request: &PageRequest) -> Result<Vec<User>, AppError>;
    /// Example-match search; see [`UserProbe::matches`].
    async fn find_by_example(&self, probe: &UserProbe) -> Result<Vec<User>, AppError>;
}

/// Storage for the `department` table.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn save(&self, department: &Department) -> Result<Department, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Department>, AppError>;
    async fn find_all(&self) -> Result<Vec<Department>, AppError>;
    async fn delete_all(&self) -> Result<(), AppError>;
    async fn delete(&self, department: &Department) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    /// Lowest-id department referencing `user_id`.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Department>, AppError>;
}
