use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    domain::OrderError,
    response::{ApiResponse, FieldError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// True when the store rejected a write because of a unique index.
pub fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten_validation_errors(None, &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::EmptyOrder => AppError::field("items", message),
            OrderError::InvalidStatus(_) => AppError::field("status", message),
            OrderError::InvalidQuantity(_) | OrderError::AmountTooLarge(_) => {
                AppError::field("items", message)
            }
            OrderError::ItemNotFound(_) => AppError::NotFound(message),
            OrderError::ItemUnavailable(_) => AppError::BadRequest(message),
            OrderError::NotAuthorized => AppError::Forbidden(message),
            OrderError::IllegalTransition { .. }
            | OrderError::OrderNotDeliverable
            | OrderError::AlreadyRated => AppError::Conflict(message),
        }
    }
}

// Nested structs and lists produce dotted paths such as `items[0].quantity`.
fn flatten_validation_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut Vec<FieldError>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(format!("invalid value ({})", err.code)));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                flatten_validation_errors(Some(&path), inner, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{path}[{index}]");
                    flatten_validation_errors(Some(&item_path), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation(errors) => {
                ApiResponse::error("Validation failed", Some(errors))
            }
            AppError::DbError(ref err) => {
                tracing::error!(error = %err, "database error");
                ApiResponse::error("Internal server error", None)
            }
            AppError::OrmError(ref err) => {
                tracing::error!(error = %err, "orm error");
                ApiResponse::error("Internal server error", None)
            }
            AppError::Internal(ref err) => {
                tracing::error!(error = %err, "internal error");
                ApiResponse::error("Internal server error", None)
            }
            other => ApiResponse::error(other.to_string(), None),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use validator::Validate;

    #[derive(Validate, serde::Serialize)]
    struct Line {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: i32,
    }

    #[derive(Validate)]
    struct Draft {
        #[validate(length(min = 1, message = "At least one item is required"), nested)]
        items: Vec<Line>,
    }

    #[test]
    fn nested_list_errors_are_flattened_with_index() {
        let draft = Draft {
            items: vec![Line { quantity: 1 }, Line { quantity: 0 }],
        };
        let err: AppError = draft.validate().expect_err("invalid").into();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields, vec![FieldError::new("items[1].quantity", "Quantity must be at least 1")]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn order_errors_map_to_taxonomy() {
        assert_eq!(
            AppError::from(OrderError::AlreadyRated).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(OrderError::NotAuthorized).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(OrderError::ItemNotFound(Uuid::nil())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(OrderError::EmptyOrder).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let err = AppError::Internal(anyhow::anyhow!("password column missing"));
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
