use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{SetActiveRequest, UpdateProfileRequest, UpdateRoleRequest, UserList},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::to_json,
    state::AppState,
};

const DEFAULT_PER_PAGE: i64 = 20;

async fn find_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize(DEFAULT_PER_PAGE);

    let finder = Users::find().order_by_desc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let users = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { users },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn update_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let existing = find_user(state, id).await?;
    let previous = existing.role;

    let mut active: ActiveModel = existing.into();
    active.role = Set(payload.role);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(user_id = %updated.id, from = %previous, to = %updated.role, "user role changed");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "user_role_update",
        "users",
        serde_json::json!({ "user_id": updated.id, "from": previous, "to": updated.role }),
    )
    .await;

    Ok(ApiResponse::success("User role updated", updated.into(), None))
}

pub async fn set_active(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SetActiveRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    if id == user.user_id && !payload.is_active {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }
    let existing = find_user(state, id).await?;

    let mut active: ActiveModel = existing.into();
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        if updated.is_active { "user_activate" } else { "user_deactivate" },
        "users",
        serde_json::json!({ "user_id": updated.id }),
    )
    .await;

    let message = if updated.is_active {
        "User activated"
    } else {
        "User deactivated"
    };
    Ok(ApiResponse::success(message, updated.into(), None))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = find_user(state, user.user_id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(to_json(&address)?));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "profile_update",
        "users",
        serde_json::json!({ "user_id": updated.id }),
    )
    .await;

    Ok(ApiResponse::success("Profile updated", updated.into(), None))
}
