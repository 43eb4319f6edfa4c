use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Reservation;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub total_reservations: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDashboard {
    pub today_reservations: Vec<Reservation>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDashboard {
    pub total_orders: i64,
    pub total_spent: Decimal,
    pub reservations: Vec<Reservation>,
}
