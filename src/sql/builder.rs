//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the fixed tables.

use super::SqlParam;
use crate::model::{Department, Direction, SortOrder, User, UserField, UserProbe};

/// Table name and column list. The first column is the generated `id`.
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub const USERS: Table = Table {
    name: "users",
    columns: &["id", "name", "age", "salary", "email"],
};

pub const DEPARTMENT: Table = Table {
    name: "department",
    columns: &["id", "name", "user_id", "loc"],
};

/// A persisted entity: which table it lives in and how its columns bind.
pub trait Record {
    const TABLE: Table;

    fn id(&self) -> Option<i32>;

    fn set_id(&mut self, id: i32);

    /// Values for every non-id column, in table column order.
    fn values(&self) -> Vec<SqlParam>;
}

impl Record for User {
    const TABLE: Table = USERS;

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlParam> {
        vec![
            self.name.as_str().into(),
            self.age.into(),
            self.salary.into(),
            self.email.as_str().into(),
        ]
    }
}

impl Record for Department {
    const TABLE: Table = DEPARTMENT;

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<SqlParam> {
        vec![
            self.name.as_str().into(),
            self.user_id.into(),
            self.loc.as_str().into(),
        ]
    }
}

/// Quote identifier for PostgreSQL (safe: only from the table definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<SqlParam>) -> usize {
        self.params.push(v.into());
        self.params.len()
    }
}

fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn id_column(table: &Table) -> String {
    quoted(table.columns[0])
}

/// SELECT every row, in id order.
pub fn select_all(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(table),
        quoted(table.name),
        id_column(table)
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &Table, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        column_list(table),
        quoted(table.name),
        id_column(table),
        n
    );
    q
}

/// SELECT the lowest-id row whose `column` equals `value`.
pub fn select_first_where_eq(table: &Table, column: &str, value: impl Into<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(value);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${} ORDER BY {} LIMIT 1",
        column_list(table),
        quoted(table.name),
        quoted(column),
        n,
        id_column(table)
    );
    q
}

/// SELECT rows whose `column` is at least `value`, in id order.
pub fn select_where_ge(table: &Table, column: &str, value: impl Into<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(value);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} >= ${} ORDER BY {}",
        column_list(table),
        quoted(table.name),
        quoted(column),
        n,
        id_column(table)
    );
    q
}

/// SELECT one window of rows under the given sort list. Text columns order case-insensitively;
/// `id` ascending closes the order unless the list already sorts on it.
pub fn select_page(table: &Table, sort: &[SortOrder], limit: i64, offset: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut order_parts: Vec<String> = sort
        .iter()
        .map(|o| {
            let col = quoted(o.field.column());
            let expr = if o.field.is_text() {
                format!("LOWER({})", col)
            } else {
                col
            };
            format!("{} {}", expr, o.direction.keyword())
        })
        .collect();
    if !sort.iter().any(|o| o.field == UserField::Id) {
        order_parts.push(format!("{} {}", id_column(table), Direction::Asc.keyword()));
    }
    let limit_n = q.push_param(limit);
    let offset_n = q.push_param(offset);
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT ${} OFFSET ${}",
        column_list(table),
        quoted(table.name),
        order_parts.join(", "),
        limit_n,
        offset_n
    );
    q
}

/// Escape LIKE wildcards so the probe matches literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Example-match over users: email equals OR name starts with, both ignoring case.
/// An empty probe selects nothing.
pub fn select_users_by_example(probe: &UserProbe) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(email) = &probe.email {
        let n = q.push_param(email.to_lowercase());
        where_parts.push(format!("LOWER({}) = ${}", quoted("email"), n));
    }
    if let Some(name) = &probe.name {
        let n = q.push_param(format!("{}%", escape_like(&name.to_lowercase())));
        where_parts.push(format!("LOWER({}) LIKE ${}", quoted("name"), n));
    }
    let where_clause = if where_parts.is_empty() {
        "FALSE".to_string()
    } else {
        where_parts.join(" OR ")
    };
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {}",
        column_list(&USERS),
        quoted(USERS.name),
        where_clause,
        id_column(&USERS)
    );
    q
}

/// INSERT all non-id columns; the database assigns the id.
pub fn insert(table: &Table, values: Vec<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols: Vec<String> = table.columns[1..].iter().map(|c| quoted(c)).collect();
    let placeholders: Vec<String> = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(table)
    );
    q
}

/// UPDATE every non-id column of one row.
pub fn update(table: &Table, id: i32, values: Vec<SqlParam>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = table.columns[1..]
        .iter()
        .zip(values)
        .map(|(c, v)| format!("{} = ${}", quoted(c), q.push_param(v)))
        .collect();
    let id_n = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        id_column(table),
        id_n,
        column_list(table)
    );
    q
}

/// DELETE by id.
pub fn delete(table: &Table, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(table.name),
        id_column(table),
        n
    );
    q
}

pub fn delete_all(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {}", quoted(table.name));
    q
}

pub fn count(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(table.name));
    q
}
