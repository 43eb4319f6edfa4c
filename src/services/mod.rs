pub mod auth_service;
pub mod dashboard_service;
pub mod menu_service;
pub mod order_service;
pub mod reservation_service;
pub mod user_service;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Serializes a value for a JSONB column.
pub(crate) fn to_json<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(e.into()))
}
