use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{AdminDashboard, CustomerDashboard, EmployeeDashboard},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin))
        .route("/employee", get(employee))
        .route("/customer", get(customer))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    responses(
        (status = 200, description = "Totals across the restaurant", body = ApiResponse<AdminDashboard>),
        (status = 403, description = "Admin only")
    ),
    tag = "Dashboard"
)]
pub async fn admin(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminDashboard>>> {
    Ok(Json(dashboard_service::admin_dashboard(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/employee",
    responses(
        (status = 200, description = "Today's reservations", body = ApiResponse<EmployeeDashboard>),
        (status = 403, description = "Staff only")
    ),
    tag = "Dashboard"
)]
pub async fn employee(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<EmployeeDashboard>>> {
    Ok(Json(dashboard_service::employee_dashboard(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/customer",
    responses(
        (status = 200, description = "Caller's order totals and reservations", body = ApiResponse<CustomerDashboard>),
        (status = 403, description = "Customers only")
    ),
    tag = "Dashboard"
)]
pub async fn customer(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerDashboard>>> {
    Ok(Json(dashboard_service::customer_dashboard(&state, &user).await?))
}
