use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{
        CatalogEntry, LineRequest, OrderError, OrderStatus, OrderType, ensure_rateable,
        format_order_number, price_order,
        rating::{MAX_RATING, MIN_RATING},
    },
    dto::orders::{
        CreateOrderRequest, OrderList, OrderListQuery, OrderWithItems, RateOrderRequest,
        UpdateOrderStatusRequest,
    },
    entity::{
        menu_items::{Column as MenuCol, Entity as MenuItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult, is_unique_violation},
    middleware::auth::{AuthUser, ensure_customer, ensure_staff},
    models::{Order, OrderItem, PaymentMethod, PaymentStatus},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::to_json,
    state::AppState,
};

const DEFAULT_PER_PAGE: i64 = 10;
const ADMIN_DEFAULT_PER_PAGE: i64 = 20;

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_customer(user)?;

    if payload.items.is_empty() {
        return Err(OrderError::EmptyOrder.into());
    }
    let order_type: OrderType = payload
        .order_type
        .parse()
        .map_err(|_| AppError::field("orderType", "Invalid order type"))?;
    let payment_method: PaymentMethod = payload
        .payment_method
        .parse()
        .map_err(|_| AppError::field("paymentMethod", "Invalid payment method"))?;
    let delivery_address = match order_type {
        OrderType::Delivery => {
            let address = payload.delivery_address.ok_or_else(|| {
                AppError::field("deliveryAddress", "Delivery address is required for delivery orders")
            })?;
            Some(to_json(&address)?)
        }
        OrderType::DineIn | OrderType::Takeaway => None,
    };

    let requests: Vec<LineRequest> = payload.items.into_iter().map(Into::into).collect();
    let ids: Vec<Uuid> = requests.iter().map(|r| r.menu_item_id).collect();

    let txn = state.orm.begin().await?;

    let catalog: HashMap<Uuid, CatalogEntry> = MenuItems::find()
        .filter(MenuCol::Id.is_in(ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| {
            (
                item.id,
                CatalogEntry {
                    id: item.id,
                    name: item.name,
                    price: item.price,
                    is_available: item.is_available,
                },
            )
        })
        .collect();

    // Nothing has been written yet; dropping `txn` on error rolls back.
    let priced = price_order(order_type, &requests, &catalog)?;

    let now = Utc::now();
    let day = now.date_naive();
    let sequence = next_order_sequence(&txn, day).await?;
    let order_number = format_order_number(day, sequence);

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        order_number: Set(order_number),
        subtotal: Set(priced.subtotal),
        tax: Set(priced.tax),
        delivery_fee: Set(priced.delivery_fee),
        total_amount: Set(priced.total),
        status: Set(OrderStatus::Pending),
        order_type: Set(order_type),
        payment_method: Set(payment_method),
        payment_status: Set(PaymentStatus::Pending),
        delivery_address: Set(delivery_address),
        special_instructions: Set(payload.special_instructions),
        estimated_delivery_time: Set(None),
        actual_delivery_time: Set(None),
        rating: Set(None),
        review: Set(None),
        assigned_staff_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict("Order number already issued, please retry".into())
        } else {
            err.into()
        }
    })?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(priced.lines.len());
    for (position, line) in priced.lines.iter().enumerate() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(line.menu_item_id),
            position: Set(position as i32),
            name: Set(line.name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            customizations: Set(to_json(&line.customizations)?),
            special_instructions: Set(line.special_instructions.clone()),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        items.push(item.into());
    }

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = %order.total_amount,
        "order created"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "order_number": order.order_number }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created successfully",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Reserves the next sequence number for `day`.
///
/// The upsert takes a row lock on the day's counter that is held until the
/// surrounding transaction ends, so concurrent creators are serialized and a
/// rolled back order gives its number back.
async fn next_order_sequence<C: ConnectionTrait>(conn: &C, day: NaiveDate) -> AppResult<i32> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO order_counters (day, last_seq)
            VALUES ($1, 1)
            ON CONFLICT (day) DO UPDATE SET last_seq = order_counters.last_seq + 1
            RETURNING last_seq
            "#,
            [day.into()],
        ))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order counter returned no row")))?;
    let sequence: i32 = row.try_get("", "last_seq")?;
    Ok(sequence)
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let condition = Condition::all().add(OrderCol::CustomerId.eq(user.user_id));
    list_matching(state, condition, pagination.normalize(DEFAULT_PER_PAGE), query).await
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_staff(user)?;
    list_matching(
        state,
        Condition::all(),
        pagination.normalize(ADMIN_DEFAULT_PER_PAGE),
        query,
    )
    .await
}

async fn list_matching(
    state: &AppState,
    mut condition: Condition,
    (page, limit, offset): (i64, i64, i64),
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = OrderStatus::parse(status)?;
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let orders = attach_items(state, orders).await?;

    Ok(ApiResponse::success(
        "Ok",
        OrderList { orders },
        Some(Meta::new(page, limit, total)),
    ))
}

async fn attach_items(state: &AppState, orders: Vec<OrderModel>) -> AppResult<Vec<OrderWithItems>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if !ids.is_empty() {
        let rows = OrderItems::find()
            .filter(OrderItemCol::OrderId.is_in(ids))
            .order_by_asc(OrderItemCol::Position)
            .all(&state.orm)
            .await?;
        for row in rows {
            by_order.entry(row.order_id).or_default().push(row.into());
        }
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems {
                order: order.into(),
                items,
            }
        })
        .collect())
}

async fn load_items<C: ConnectionTrait>(conn: &C, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    Ok(OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Position)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    if !user.is_staff() && order.customer_id != user.user_id {
        return Err(AppError::Forbidden("Not authorized to view this order".into()));
    }

    let items = load_items(&state.orm, order.id).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_staff(user)?;
    let target = OrderStatus::parse(&payload.status)?;

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    let previous = order.status;
    let next = previous.transition(target, order.order_type)?;
    let assigned = order.assigned_staff_id;

    let now = Utc::now();
    let mut active: OrderActive = order.into();
    active.status = Set(next);
    if next == OrderStatus::Delivered {
        active.actual_delivery_time = Set(Some(now.into()));
    }
    if assigned.is_none() {
        active.assigned_staff_id = Set(Some(user.user_id));
    }
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    let items = load_items(&txn, order.id).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, from = %previous, to = %next, "order status changed");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": previous, "to": next }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order status updated successfully",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn rate_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_customer(user)?;
    if !(MIN_RATING..=MAX_RATING).contains(&payload.rating) {
        return Err(AppError::field("rating", "Rating must be between 1 and 5"));
    }

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    ensure_rateable(order.customer_id, order.status, order.rating, user.user_id)?;

    let mut active: OrderActive = order.into();
    active.rating = Set(Some(payload.rating));
    active.review = Set(payload.review);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "order_rate",
        "orders",
        serde_json::json!({ "order_id": order.id, "rating": order.rating }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order rated successfully",
        order.into(),
        Some(Meta::empty()),
    ))
}
