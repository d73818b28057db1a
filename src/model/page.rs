//! Page requests, sort orders and the paginated user response.

use super::User;
use crate::error::AppError;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;
use utoipa::ToSchema;

pub const DEFAULT_SORT: &str = "id;ASC,name;DESC";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Sortable user columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserField {
    Id,
    Name,
    Age,
    Salary,
    Email,
}

impl UserField {
    pub fn column(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Name => "name",
            UserField::Age => "age",
            UserField::Salary => "salary",
            UserField::Email => "email",
        }
    }

    /// Text columns sort case-insensitively.
    pub fn is_text(self) -> bool {
        matches!(self, UserField::Name | UserField::Email)
    }

    fn compare(self, a: &User, b: &User) -> Ordering {
        match self {
            UserField::Id => a.id.cmp(&b.id),
            UserField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            UserField::Age => a.age.cmp(&b.age),
            UserField::Salary => a.salary.total_cmp(&b.salary),
            UserField::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        }
    }
}

impl FromStr for UserField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(UserField::Id),
            "name" => Ok(UserField::Name),
            "age" => Ok(UserField::Age),
            "salary" => Ok(UserField::Salary),
            "email" => Ok(UserField::Email),
            other => Err(AppError::BadRequest(format!("unknown sort field: {}", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Only `DESC` (any case) is descending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: UserField,
    pub direction: Direction,
}

impl FromStr for SortOrder {
    type Err = AppError;

    /// `field;DIRECTION`, or a bare `field` for ascending.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match token.split_once(';') {
            Some((f, d)) => (f, Direction::parse(d)),
            None => (token, Direction::Asc),
        };
        Ok(SortOrder {
            field: field.parse()?,
            direction,
        })
    }
}

/// Zero-based page index, a size kept within `1..=MAX_PAGE_SIZE`, and a sort list.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Vec<SortOrder>) -> Self {
        PageRequest {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort,
        }
    }

    /// Parse `sort` query values. Each value may hold several comma-separated tokens;
    /// no tokens at all means [`DEFAULT_SORT`].
    pub fn parse_sort<S: AsRef<str>>(values: &[S]) -> Result<Vec<SortOrder>, AppError> {
        let tokens: Vec<&str> = values
            .iter()
            .flat_map(|v| v.as_ref().split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return DEFAULT_SORT.split(',').map(str::parse).collect();
        }
        tokens.into_iter().map(str::parse).collect()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Ordering of two users under this request's sort list, ties broken by
    /// ascending id.
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        for order in &self.sort {
            let ord = order.field.compare(a, b);
            let ord = match order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.id.cmp(&b.id)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        let sort = DEFAULT_SORT
            .split(',')
            .filter_map(|t| t.parse().ok())
            .collect();
        PageRequest::new(0, DEFAULT_PAGE_SIZE, sort)
    }
}

/// One page of users plus the totals a client needs to render pagination.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub content: Vec<User>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl UserPage {
    pub fn new(content: Vec<User>, request: &PageRequest, total: i64) -> Self {
        let size = i64::from(request.size).max(1);
        UserPage {
            content,
            page: request.page,
            size: request.size,
            total_elements: total,
            total_pages: (total + size - 1) / size,
        }
    }
}
