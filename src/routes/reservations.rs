use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::reservations::{
        CreateReservationRequest, ReservationDateQuery, ReservationList,
        UpdateReservationStatusRequest,
    },
    error::AppResult,
    middleware::{
        auth::AuthUser,
        validate::{Path, Query, ValidatedJson},
    },
    models::Reservation,
    response::ApiResponse,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_reservations).post(create_reservation))
        .route("/all", get(list_all_reservations))
        .route("/code/{code}", get(get_by_code))
        .route("/{id}/status", patch(update_status))
        .route("/{id}", delete(cancel_reservation))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<Reservation>),
        (status = 400, description = "Validation failed")
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Reservation>>)> {
    let resp = reservation_service::create_reservation(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    responses(
        (status = 200, description = "Caller's reservations", body = ApiResponse<ReservationList>)
    ),
    tag = "Reservations"
)]
pub async fn list_my_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    let resp = reservation_service::list_my_reservations(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reservations/all",
    params(("date" = Option<String>, Query, description = "Only this day, YYYY-MM-DD")),
    responses(
        (status = 200, description = "All reservations", body = ApiResponse<ReservationList>),
        (status = 403, description = "Staff only")
    ),
    tag = "Reservations"
)]
pub async fn list_all_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReservationDateQuery>,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    let resp = reservation_service::list_all_reservations(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reservations/code/{code}",
    params(("code" = String, Path, description = "Confirmation code")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<Reservation>),
        (status = 404, description = "No reservation with this code")
    ),
    tag = "Reservations"
)]
pub async fn get_by_code(
    State(state): State<AppState>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::get_by_code(&state, &user, &code).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/reservations/{id}/status",
    params(("id" = Uuid, Path, description = "Reservation id")),
    request_body = UpdateReservationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Reservation>),
        (status = 404, description = "Reservation not found")
    ),
    tag = "Reservations"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateReservationStatusRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::update_reservation_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<Reservation>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Reservation not found")
    ),
    tag = "Reservations"
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::cancel_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}
