//! JSON request bodies whose rejections render as `AppError`.

use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

/// Like [`Json`], but a body that fails to parse is answered with the error
/// envelope instead of plain text.
#[derive(Clone, Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewUser;
    use axum::http::header;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/users");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(axum::body::Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_is_decoded() {
        let req = request(Some("application/json"), r#"{"name":"Ann","age":3}"#);
        let JsonBody(user) = JsonBody::<NewUser>::from_request(req, &()).await.unwrap();
        assert_eq!((user.name.as_str(), user.age), ("Ann", 3));
    }

    #[tokio::test]
    async fn syntax_errors_and_missing_content_type_are_bad_requests() {
        let req = request(Some("application/json"), "{not json");
        let err = JsonBody::<NewUser>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let req = request(None, "{}");
        let err = JsonBody::<NewUser>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn wrongly_typed_fields_fail_validation() {
        let req = request(Some("application/json"), r#"{"age":"old"}"#);
        let err = JsonBody::<NewUser>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.len() == 1));
    }
}
