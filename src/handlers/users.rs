//! User handlers: CRUD, paging, age filter, id fan-out, department join, search.

use crate::error::{AppError, ErrorBody};
use crate::extractors::{JsonBody, PageQuery};
use crate::model::{NewUser, User, UserDepartment, UserPage};
use crate::response;
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

fn parse_path_int(name: &str, raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be an integer, got {:?}", name, raw)))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Exact email, ignoring case.
    pub email: Option<String>,
    /// Name prefix, ignoring case.
    pub name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate_user(&body)?;
    let user = state.users.create_user(body).await?;
    Ok(response::created(user))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses((status = 200, description = "Every user", body = [User]))
)]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = state.users.get_all_users().await?;
    Ok(response::ok(users))
}

#[utoipa::path(
    get,
    path = "/users/all",
    tag = "Users",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page index (default 0)"),
        ("size" = Option<u32>, Query, description = "Page size (default 10, max 1000)"),
        ("sort" = Option<String>, Query, description = "field;DIRECTION tokens (default id;ASC,name;DESC)")
    ),
    responses(
        (status = 200, description = "One page of users", body = UserPage),
        (status = 400, description = "Bad paging parameters", body = ErrorBody)
    )
)]
pub async fn list_page(
    State(state): State<AppState>,
    PageQuery(request): PageQuery,
) -> Result<impl IntoResponse, AppError> {
    let page = state.users.get_users(request).await?;
    Ok(response::ok(page))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_path_int("user_id", &user_id)?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    Ok(response::ok(user))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User id")),
    request_body = NewUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "No such user", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_path_int("user_id", &user_id)?;
    RequestValidator::validate_user(&body)?;
    let user = state
        .users
        .update_user(user_id, body)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("user {} does not exist", user_id)))?;
    Ok(response::ok(user))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_path_int("user_id", &user_id)?;
    state
        .users
        .delete_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/users/age/{age}",
    tag = "Users",
    params(("age" = i32, Path, description = "Minimum age, inclusive")),
    responses((status = 200, description = "Users at least this old", body = [User]))
)]
pub async fn by_age(
    State(state): State<AppState>,
    Path(age): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let age = parse_path_int("age", &age)?;
    let users = state.users.find_users_by_age(age).await?;
    Ok(response::ok(users))
}

#[utoipa::path(
    post,
    path = "/users/search/id",
    tag = "Users",
    request_body = Vec<i32>,
    responses((status = 200, description = "Users found, highest id first", body = [User]))
)]
pub async fn fetch_by_ids(
    State(state): State<AppState>,
    JsonBody(ids): JsonBody<Vec<i32>>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.users.fetch_users(&ids).await?;
    Ok(response::ok(users))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/department",
    tag = "Users",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User joined with its department", body = UserDepartment),
        (status = 404, description = "User or department missing", body = ErrorBody)
    )
)]
pub async fn department(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_path_int("user_id", &user_id)?;
    let joined = state
        .users
        .fetch_user_and_department(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} with a department", user_id)))?;
    Ok(response::ok(joined))
}

#[utoipa::path(
    get,
    path = "/users/search",
    tag = "Users",
    params(SearchParams),
    responses((status = 200, description = "Users matching email or name prefix", body = [User]))
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let users = state
        .users
        .find_users_by_email_or_name(params.email.as_deref(), params.name.as_deref())
        .await?;
    Ok(response::ok(users))
}
