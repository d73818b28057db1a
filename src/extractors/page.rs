//! Extract a page request from `?page=&size=&sort=` query parameters.

use crate::error::AppError;
use crate::model::{PageRequest, DEFAULT_PAGE_SIZE};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, extract::Query, http::request::Parts};

/// Page request parsed from the query string. `sort` may repeat and each
/// value may carry several comma-separated `field;DIRECTION` tokens.
#[derive(Clone, Debug)]
pub struct PageQuery(pub PageRequest);

fn parse_number(name: &str, raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut page = 0;
        let mut size = DEFAULT_PAGE_SIZE;
        let mut sort = Vec::new();
        for (k, v) in pairs {
            match k.as_str() {
                "page" => page = parse_number("page", &v)?,
                "size" => size = parse_number("size", &v)?,
                "sort" => sort.push(v),
                _ => {}
            }
        }
        let sort = PageRequest::parse_sort(&sort)?;
        Ok(PageQuery(PageRequest::new(page, size, sort)))
    }
}
