use chrono::Utc;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::reservations::{
        CreateReservationRequest, ReservationDateQuery, ReservationList,
        UpdateReservationStatusRequest,
    },
    entity::reservations::{ActiveModel, Column, Entity as Reservations, Model as ReservationModel},
    error::{AppError, AppResult, is_unique_violation},
    middleware::auth::{AuthUser, ensure_customer, ensure_staff},
    models::{Occasion, Reservation, ReservationStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

const CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_ATTEMPTS: usize = 5;

pub fn generate_confirmation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Pads the hour so stored times sort lexicographically, e.g. `9:30` -> `09:30`.
pub fn normalize_time(value: &str) -> String {
    match value.split_once(':') {
        Some((h, m)) if h.len() == 1 => format!("0{h}:{m}"),
        _ => value.to_string(),
    }
}

fn can_access(user: &AuthUser, reservation: &ReservationModel) -> bool {
    user.is_staff() || reservation.customer_id == user.user_id
}

pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_customer(user)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::field("name", "This field is required"));
    }
    let phone = payload.phone.trim();
    if phone.is_empty() {
        return Err(AppError::field("phone", "This field is required"));
    }

    let now = Utc::now();
    let time = normalize_time(&payload.time);
    let occasion = payload.occasion.unwrap_or(Occasion::Casual);

    let mut attempt = 0;
    let reservation = loop {
        attempt += 1;
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(user.user_id),
            name: Set(name.to_string()),
            email: Set(payload.email.trim().to_lowercase()),
            phone: Set(phone.to_string()),
            date: Set(payload.date),
            time: Set(time.clone()),
            party_size: Set(payload.party_size),
            table_number: Set(None),
            status: Set(ReservationStatus::Pending),
            special_requests: Set(payload.special_requests.clone()),
            occasion: Set(occasion),
            confirmation_code: Set(generate_confirmation_code()),
            assigned_staff_id: Set(None),
            notes: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        match active.insert(&state.orm).await {
            Ok(model) => break model,
            Err(err) if is_unique_violation(&err) && attempt < CODE_ATTEMPTS => {
                tracing::debug!(attempt, "confirmation code collision, regenerating");
            }
            Err(err) => return Err(err.into()),
        }
    };

    tracing::info!(
        reservation_id = %reservation.id,
        code = %reservation.confirmation_code,
        "reservation created"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        "reservation_create",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        reservation.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_my_reservations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReservationList>> {
    ensure_customer(user)?;
    let reservations = Reservations::find()
        .filter(Column::CustomerId.eq(user.user_id))
        .order_by_desc(Column::Date)
        .order_by_desc(Column::Time)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();
    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { reservations },
        None,
    ))
}

pub async fn list_all_reservations(
    state: &AppState,
    user: &AuthUser,
    query: ReservationDateQuery,
) -> AppResult<ApiResponse<ReservationList>> {
    ensure_staff(user)?;
    let mut condition = Condition::all();
    if let Some(date) = query.date {
        condition = condition.add(Column::Date.eq(date));
    }
    let reservations = Reservations::find()
        .filter(condition)
        .order_by_desc(Column::Date)
        .order_by_desc(Column::Time)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reservation::from)
        .collect();
    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { reservations },
        None,
    ))
}

pub async fn get_by_code(
    state: &AppState,
    user: &AuthUser,
    code: &str,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = Reservations::find()
        .filter(Column::ConfirmationCode.eq(code.trim().to_uppercase()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation"))?;
    if !can_access(user, &reservation) {
        return Err(AppError::Forbidden("Not authorized".into()));
    }
    Ok(ApiResponse::success("Reservation", reservation.into(), None))
}

pub async fn update_reservation_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReservationStatusRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_staff(user)?;
    let status: ReservationStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::field("status", "Invalid status"))?;

    let existing = Reservations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation"))?;

    let previous = existing.status;
    let unassigned = existing.assigned_staff_id.is_none();
    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    if let Some(table) = payload.table_number {
        active.table_number = Set(Some(table));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    if unassigned {
        active.assigned_staff_id = Set(Some(user.user_id));
    }
    active.updated_at = Set(Utc::now().into());
    let reservation = active.update(&state.orm).await?;

    tracing::info!(reservation_id = %reservation.id, from = %previous, to = %status, "reservation status changed");
    audit::record(
        &state.pool,
        Some(user.user_id),
        "reservation_status_update",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id, "from": previous, "to": status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation status updated",
        reservation.into(),
        Some(Meta::empty()),
    ))
}

/// Marks the reservation cancelled; the row is kept.
pub async fn cancel_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reservation>> {
    let existing = Reservations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Reservation"))?;

    if !can_access(user, &existing) {
        return Err(AppError::Forbidden("Not authorized".into()));
    }
    if existing.status == ReservationStatus::Completed {
        return Err(AppError::Conflict(
            "Completed reservations cannot be cancelled".into(),
        ));
    }

    let mut active: ActiveModel = existing.into();
    active.status = Set(ReservationStatus::Cancelled);
    active.updated_at = Set(Utc::now().into());
    let reservation = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "reservation_cancel",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation cancelled",
        reservation.into(),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_code_is_six_uppercase_alphanumerics() {
        for _ in 0..100 {
            let code = generate_confirmation_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn single_digit_hours_are_padded() {
        assert_eq!(normalize_time("9:30"), "09:30");
        assert_eq!(normalize_time("19:30"), "19:30");
    }
}
