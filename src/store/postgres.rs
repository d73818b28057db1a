//! PostgreSQL repositories built on the SQL builder.

use super::{DepartmentRepository, UserRepository};
use crate::error::AppError;
use crate::model::{Department, PageRequest, User, UserProbe};
use crate::sql::{self, QueryBuf, Record};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepository { pool }
    }
}

pub struct PgDepartmentRepository {
    pool: PgPool,
}

impl PgDepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        PgDepartmentRepository { pool }
    }
}

async fn fetch_all<T>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let rows = sql::bind_as(sqlx::query_as::<_, T>(&q.sql), &q.params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_optional<T>(pool: &PgPool, q: &QueryBuf) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let row = sql::bind_as(sqlx::query_as::<_, T>(&q.sql), &q.params)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn execute(pool: &PgPool, q: &QueryBuf) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
    let done = sql::bind(sqlx::query(&q.sql), &q.params)
        .execute(pool)
        .await?;
    Ok(done.rows_affected())
}

async fn count(pool: &PgPool, q: &QueryBuf) -> Result<i64, AppError> {
    tracing::debug!(sql = %q.sql, "query");
    let n: i64 = sqlx::query_scalar(&q.sql).fetch_one(pool).await?;
    Ok(n)
}

/// Insert or update by id. Updating a row that no longer exists is `RowNotFound`.
async fn save<T>(pool: &PgPool, entity: &T) -> Result<T, AppError>
where
    T: Record + for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let q = match entity.id() {
        None => sql::insert(&T::TABLE, entity.values()),
        Some(id) => sql::update(&T::TABLE, id, entity.values()),
    };
    fetch_optional(pool, &q)
        .await?
        .ok_or(AppError::Db(sqlx::Error::RowNotFound))
}

async fn delete<T: Record>(pool: &PgPool, entity: &T) -> Result<(), AppError> {
    if let Some(id) = entity.id() {
        execute(pool, &sql::delete(&T::TABLE, id)).await?;
    }
    Ok(())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: &User) -> Result<User, AppError> {
        save(&self.pool, user).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        fetch_optional(&self.pool, &sql::select_by_id(&sql::USERS, id)).await
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        fetch_all(&self.pool, &sql::select_all(&sql::USERS)).await
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        execute(&self.pool, &sql::delete_all(&sql::USERS)).await?;
        Ok(())
    }

    async fn delete(&self, user: &User) -> Result<(), AppError> {
        delete(&self.pool, user).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        count(&self.pool, &sql::count(&sql::USERS)).await
    }

    async fn find_by_age(&self, min_age: i32) -> Result<Vec<User>, AppError> {
        fetch_all(&self.pool, &sql::select_where_ge(&sql::USERS, "age", min_age)).await
    }

    async fn find_all_by(&self, request: &PageRequest) -> Result<Vec<User>, AppError> {
        let q = sql::select_page(&sql::USERS, request.sort(), request.limit(), request.offset());
        fetch_all(&self.pool, &q).await
    }

    async fn find_by_example(&self, probe: &UserProbe) -> Result<Vec<User>, AppError> {
        fetch_all(&self.pool, &sql::select_users_by_example(probe)).await
    }
}

#[async_trait]
impl DepartmentRepository for PgDepartmentRepository {
    async fn save(&self, department: &Department) -> Result<Department, AppError> {
        save(&self.pool, department).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Department>, AppError> {
        fetch_optional(&self.pool, &sql::select_by_id(&sql::DEPARTMENT, id)).await
    }

    async fn find_all(&self) -> Result<Vec<Department>, AppError> {
        fetch_all(&self.pool, &sql::select_all(&sql::DEPARTMENT)).await
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        execute(&self.pool, &sql::delete_all(&sql::DEPARTMENT)).await?;
        Ok(())
    }

    async fn delete(&self, department: &Department) -> Result<(), AppError> {
        delete(&self.pool, department).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        count(&self.pool, &sql::count(&sql::DEPARTMENT)).await
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Department>, AppError> {
        let q = sql::select_first_where_eq(&sql::DEPARTMENT, "user_id", user_id);
        fetch_optional(&self.pool, &q).await
    }
}
