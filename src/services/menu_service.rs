use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::menu::{CategoryList, CreateMenuItemRequest, MenuItemList, MenuQuery, UpdateMenuItemRequest},
    entity::menu_items::{ActiveModel, Column, Entity as MenuItems},
    error::{AppError, AppResult, is_unique_violation},
    middleware::auth::{AuthUser, ensure_admin},
    models::{MenuCategory, MenuItem},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::to_json,
    state::AppState,
};

const DEFAULT_PER_PAGE: i64 = 50;
const DEFAULT_PREPARATION_MINUTES: i32 = 15;

fn duplicate_name(err: sea_orm::DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict("A menu item with this name already exists".into())
    } else {
        err.into()
    }
}

pub async fn list_menu_items(
    state: &AppState,
    pagination: Pagination,
    query: MenuQuery,
) -> AppResult<ApiResponse<MenuItemList>> {
    let (page, limit, offset) = pagination.normalize(DEFAULT_PER_PAGE);
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty() && *c != "all") {
        let category: MenuCategory = category
            .parse()
            .map_err(|_| AppError::field("category", "Invalid category"))?;
        condition = condition.add(Column::Category.eq(category));
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(available) = query.is_available {
        condition = condition.add(Column::IsAvailable.eq(available));
    }

    let finder = MenuItems::find()
        .filter(condition)
        .order_by_desc(Column::Popularity)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let menu_items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Menu items",
        MenuItemList { menu_items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Menu item"))?;
    Ok(ApiResponse::success("Menu item", item.into(), None))
}

/// Categories that currently have at least one menu item.
pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let categories: Vec<MenuCategory> = MenuItems::find()
        .select_only()
        .column(Column::Category)
        .distinct()
        .order_by_asc(Column::Category)
        .into_tuple()
        .all(&state.orm)
        .await?;
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { categories },
        None,
    ))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        image: Set(payload.image),
        is_vegetarian: Set(payload.is_vegetarian),
        is_vegan: Set(payload.is_vegan),
        is_gluten_free: Set(payload.is_gluten_free),
        is_spicy: Set(payload.is_spicy),
        allergens: Set(to_json(&payload.allergens)?),
        preparation_time: Set(payload.preparation_time.unwrap_or(DEFAULT_PREPARATION_MINUTES)),
        is_available: Set(payload.is_available.unwrap_or(true)),
        popularity: Set(0),
        tags: Set(to_json(&payload.tags)?),
        customizations: Set(to_json(&payload.customizations)?),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let item = active.insert(&state.orm).await.map_err(duplicate_name)?;

    tracing::info!(menu_item_id = %item.id, name = %item.name, "menu item created");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "menu_item_create",
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item created successfully",
        item.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Menu item"))?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(v) = payload.is_vegetarian {
        active.is_vegetarian = Set(v);
    }
    if let Some(v) = payload.is_vegan {
        active.is_vegan = Set(v);
    }
    if let Some(v) = payload.is_gluten_free {
        active.is_gluten_free = Set(v);
    }
    if let Some(v) = payload.is_spicy {
        active.is_spicy = Set(v);
    }
    if let Some(allergens) = payload.allergens {
        active.allergens = Set(to_json(&allergens)?);
    }
    if let Some(minutes) = payload.preparation_time {
        active.preparation_time = Set(minutes);
    }
    if let Some(available) = payload.is_available {
        active.is_available = Set(available);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(to_json(&tags)?);
    }
    if let Some(customizations) = payload.customizations {
        active.customizations = Set(to_json(&customizations)?);
    }
    active.updated_at = Set(Utc::now().into());

    let item = active.update(&state.orm).await.map_err(duplicate_name)?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "menu_item_update",
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item updated successfully",
        item.into(),
        Some(Meta::empty()),
    ))
}

/// Flips `is_available`; unavailable items stay listed but cannot be ordered.
pub async fn toggle_availability(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Menu item"))?;

    let available = !existing.is_available;
    let mut active: ActiveModel = existing.into();
    active.is_available = Set(available);
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    tracing::info!(menu_item_id = %item.id, available, "menu item availability changed");

    let message = if available {
        "Menu item is now available"
    } else {
        "Menu item is now unavailable"
    };
    Ok(ApiResponse::success(message, item.into(), Some(Meta::empty())))
}

pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<()>> {
    ensure_admin(user)?;
    let res = MenuItems::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::Conflict(
                "Menu item appears on existing orders; mark it unavailable instead".into(),
            ),
            _ => err.into(),
        })?;
    if res.rows_affected == 0 {
        return Err(AppError::not_found("Menu item"));
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "menu_item_delete",
        "menu_items",
        serde_json::json!({ "menu_item_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Menu item deleted successfully", (), None))
}
