//! User routes.

use crate::handlers::users::{
    by_age, create, delete as delete_handler, department, fetch_by_ids, list, list_page, read,
    search, update,
};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/all", get(list_page))
        .route("/users/search", get(search))
        .route("/users/search/id", post(fetch_by_ids))
        .route("/users/age/:age", get(by_age))
        .route(
            "/users/:user_id",
            get(read).put(update).delete(delete_handler),
        )
        .route("/users/:user_id/department", get(department))
        .with_state(state)
}
