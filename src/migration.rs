//! Create the `users` and `department` tables. Idempotent.

use crate::error::AppError;
use crate::sql::{Table, DEPARTMENT, USERS};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Column types in table column order; `id` is first.
const USER_TYPES: &[&str] = &[
    "SERIAL PRIMARY KEY",
    "TEXT NOT NULL",
    "INTEGER NOT NULL",
    "DOUBLE PRECISION NOT NULL",
    "TEXT NOT NULL",
];

const DEPARTMENT_TYPES: &[&str] = &[
    "SERIAL PRIMARY KEY",
    "TEXT NOT NULL",
    "INTEGER NOT NULL",
    "TEXT NOT NULL",
];

fn create_table_sql(table: &Table, types: &[&str]) -> String {
    let col_defs: Vec<String> = table
        .columns
        .iter()
        .zip(types)
        .map(|(c, t)| format!("{} {}", quote(c), t))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(table.name),
        col_defs.join(",\n  ")
    )
}

fn statements() -> Vec<String> {
    vec![
        create_table_sql(&USERS, USER_TYPES),
        create_table_sql(&DEPARTMENT, DEPARTMENT_TYPES),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            quote("department_user_id_idx"),
            quote(DEPARTMENT.name),
            quote("user_id")
        ),
    ]
}

/// Apply the schema. Safe to run on every start.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for sql in statements() {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!("schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_table_ddl() {
        assert_eq!(
            create_table_sql(&USERS, USER_TYPES),
            "CREATE TABLE IF NOT EXISTS \"users\" (\n  \"id\" SERIAL PRIMARY KEY,\n  \"name\" TEXT NOT NULL,\n  \"age\" INTEGER NOT NULL,\n  \"salary\" DOUBLE PRECISION NOT NULL,\n  \"email\" TEXT NOT NULL\n)"
        );
    }

    #[test]
    fn every_column_has_a_type() {
        assert_eq!(USERS.columns.len(), USER_TYPES.len());
        assert_eq!(DEPARTMENT.columns.len(), DEPARTMENT_TYPES.len());
        let all = statements();
        assert_eq!(all.len(), 3);
        assert!(all[1].contains("\"user_id\" INTEGER NOT NULL"));
        assert!(all.iter().all(|s| s.contains("IF NOT EXISTS")));
    }
}
