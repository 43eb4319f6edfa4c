use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Request,
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed `validator` checks.
///
/// Malformed bodies and failed checks are both reported through the API
/// error envelope instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `axum::extract::Path` with rejections as field errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Path(value)| Path(value))
            .map_err(path_error)
    }
}

fn path_error(rejection: PathRejection) -> AppError {
    let err = match rejection {
        PathRejection::FailedToDeserializePathParams(err) => err,
        other => return AppError::Internal(anyhow::anyhow!(other.body_text())),
    };
    match err.kind() {
        ErrorKind::ParseErrorAtKey { key, .. }
        | ErrorKind::DeserializeError { key, .. }
        | ErrorKind::InvalidUtf8InPathParam { key } => {
            AppError::field(key, format!("Invalid {key}"))
        }
        ErrorKind::UnsupportedType { .. } => AppError::Internal(anyhow::anyhow!(err.body_text())),
        _ => AppError::field("id", "Invalid id"),
    }
}

/// `axum::extract::Query` with rejections as field errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| Query(value))
            .map_err(query_error)
    }
}

fn query_error(rejection: QueryRejection) -> AppError {
    let text = rejection.body_text();
    let detail = text
        .strip_prefix("Failed to deserialize query string: ")
        .unwrap_or(&text);
    match detail.split_once(": ") {
        Some((field, message)) if !field.is_empty() && !field.contains(' ') => {
            AppError::field(field, message)
        }
        _ => AppError::field("query", detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[allow(dead_code)]
        page: Option<i64>,
    }

    #[tokio::test]
    async fn bad_query_value_names_the_field() {
        let (mut parts, _) = HttpRequest::get("/api/menu?page=abc")
            .body(())
            .expect("request")
            .into_parts();
        let err = Query::<Filter>::from_request_parts(&mut parts, &())
            .await
            .expect_err("invalid page");
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "page");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
