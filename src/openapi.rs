use utoipa::OpenApi;

use crate::error::{ErrorBody, ErrorDetail};
use crate::model::{Department, NewUser, User, UserDepartment, UserPage};

/// OpenAPI document for the user directory.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        version = "0.1.0",
        description = "Create, read, update, delete and search users and their departments."
    ),
    tags(
        (name = "Users", description = "User records, paging, search and department lookup")
    ),
    paths(
        crate::handlers::users::create,
        crate::handlers::users::list,
        crate::handlers::users::list_page,
        crate::handlers::users::read,
        crate::handlers::users::update,
        crate::handlers::users::delete,
        crate::handlers::users::by_age,
        crate::handlers::users::fetch_by_ids,
        crate::handlers::users::department,
        crate::handlers::users::search
    ),
    components(
        schemas(
            User,
            NewUser,
            Department,
            UserDepartment,
            UserPage,
            ErrorBody,
            ErrorDetail
        )
    )
)]
pub struct ApiDoc;
