use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::dashboard::{AdminDashboard, CustomerDashboard, EmployeeDashboard},
    entity::{
        Users,
        orders::{Column as OrderCol, Entity as Orders},
        reservations::{Column as ReservationCol, Entity as Reservations},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin, ensure_customer, ensure_staff},
    models::Reservation,
    response::ApiResponse,
    state::AppState,
};

async fn sum_order_totals<C: ConnectionTrait>(conn: &C, condition: Condition) -> AppResult<Decimal> {
    let total: Option<Option<Decimal>> = Orders::find()
        .select_only()
        .column_as(OrderCol::TotalAmount.sum(), "total")
        .filter(condition)
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(Decimal::ZERO))
}

pub async fn admin_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminDashboard>> {
    ensure_admin(user)?;
    let total_users = Users::find().count(&state.orm).await? as i64;
    let total_orders = Orders::find().count(&state.orm).await? as i64;
    let total_revenue = sum_order_totals(&state.orm, Condition::all()).await?;
    let total_reservations = Reservations::find().count(&state.orm).await? as i64;

    Ok(ApiResponse::success(
        "Admin dashboard",
        AdminDashboard {
            total_users,
            total_orders,
            total_revenue,
            total_reservations,
        },
        None,
    ))
}

pub async fn employee_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<EmployeeDashboard>> {
    ensure_staff(user)?;
    let today = Utc::now().date_naive();
    let today_reservations = Reservations::find()
        .filter(ReservationCol::Date.eq(today))
        .order_by_asc(ReservationCol::Time)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();

    Ok(ApiResponse::success(
        "Employee dashboard",
        EmployeeDashboard { today_reservations },
        None,
    ))
}

pub async fn customer_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CustomerDashboard>> {
    ensure_customer(user)?;
    let owner: Uuid = user.user_id;
    let total_orders = Orders::find()
        .filter(OrderCol::CustomerId.eq(owner))
        .count(&state.orm)
        .await? as i64;
    let total_spent =
        sum_order_totals(&state.orm, Condition::all().add(OrderCol::CustomerId.eq(owner))).await?;
    let reservations = Reservations::find()
        .filter(ReservationCol::CustomerId.eq(owner))
        .order_by_desc(ReservationCol::Date)
        .order_by_desc(ReservationCol::Time)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();

    Ok(ApiResponse::success(
        "Customer dashboard",
        CustomerDashboard {
            total_orders,
            total_spent,
            reservations,
        },
        None,
    ))
}
