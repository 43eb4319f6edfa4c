mod common;

use chrono::{Duration, Utc};
use common::{create_user, setup_state};
use restaurant_api::{
    dto::reservations::{
        CreateReservationRequest, ReservationDateQuery, UpdateReservationStatusRequest,
    },
    error::AppError,
    models::{Occasion, ReservationStatus, Role},
    services::reservation_service,
};

fn booking(days_ahead: i64, time: &str) -> CreateReservationRequest {
    CreateReservationRequest {
        name: "Asha Rao".into(),
        email: "Asha@Example.com".into(),
        phone: "+919800000000".into(),
        date: (Utc::now() + Duration::days(days_ahead)).date_naive(),
        time: time.into(),
        party_size: 4,
        special_requests: Some("Window seat".into()),
        occasion: Some(Occasion::Birthday),
    }
}

#[tokio::test]
async fn reservation_lifecycle() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let other = create_user(&state, Role::Customer).await?;
    let staff = create_user(&state, Role::Employee).await?;

    let created = reservation_service::create_reservation(&state, &customer, booking(3, "9:30"))
        .await?
        .data
        .expect("reservation");
    assert_eq!(created.status, ReservationStatus::Pending);
    assert_eq!(created.time, "09:30");
    assert_eq!(created.email, "asha@example.com");
    assert_eq!(created.confirmation_code.len(), 6);

    reservation_service::create_reservation(&state, &customer, booking(5, "20:00")).await?;

    let mine = reservation_service::list_my_reservations(&state, &customer)
        .await?
        .data
        .expect("list")
        .reservations;
    assert_eq!(mine.len(), 2);
    assert!(mine[0].date > mine[1].date, "newest date first");

    // Code lookup: owner and staff may see it, other customers may not.
    let code = created.confirmation_code.to_lowercase();
    assert!(reservation_service::get_by_code(&state, &customer, &code).await.is_ok());
    assert!(reservation_service::get_by_code(&state, &staff, &code).await.is_ok());
    let err = reservation_service::get_by_code(&state, &other, &code)
        .await
        .expect_err("other customer");
    assert!(matches!(err, AppError::Forbidden(_)));

    let on_day = reservation_service::list_all_reservations(
        &state,
        &staff,
        ReservationDateQuery {
            date: Some(created.date),
        },
    )
    .await?
    .data
    .expect("list")
    .reservations;
    assert!(on_day.iter().any(|r| r.id == created.id));
    assert!(on_day.iter().all(|r| r.date == created.date));

    let err = reservation_service::list_all_reservations(&state, &customer, ReservationDateQuery { date: None })
        .await
        .expect_err("customer");
    assert!(matches!(err, AppError::Forbidden(_)));

    let confirmed = reservation_service::update_reservation_status(
        &state,
        &staff,
        created.id,
        UpdateReservationStatusRequest {
            status: "confirmed".into(),
            table_number: Some(7),
            notes: None,
        },
    )
    .await?
    .data
    .expect("reservation");
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert_eq!(confirmed.table_number, Some(7));
    assert_eq!(confirmed.assigned_staff_id, Some(staff.user_id));

    let err = reservation_service::update_reservation_status(
        &state,
        &staff,
        created.id,
        UpdateReservationStatusRequest {
            status: "seated".into(),
            table_number: None,
            notes: None,
        },
    )
    .await
    .expect_err("unknown status");
    assert!(matches!(err, AppError::Validation(_)));

    let err = reservation_service::cancel_reservation(&state, &other, created.id)
        .await
        .expect_err("not owner");
    assert!(matches!(err, AppError::Forbidden(_)));

    let cancelled = reservation_service::cancel_reservation(&state, &customer, created.id)
        .await?
        .data
        .expect("reservation");
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);

    Ok(())
}

#[tokio::test]
async fn blank_contact_details_are_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;

    let mut request = booking(2, "19:00");
    request.name = "   ".into();
    match reservation_service::create_reservation(&state, &customer, request).await {
        Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "name"),
        other => panic!("unexpected {other:?}"),
    }

    let mut request = booking(2, "19:00");
    request.phone = " ".into();
    match reservation_service::create_reservation(&state, &customer, request).await {
        Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "phone"),
        other => panic!("unexpected {other:?}"),
    }

    let mine = reservation_service::list_my_reservations(&state, &customer)
        .await?
        .data
        .expect("list")
        .reservations;
    assert!(mine.is_empty());

    Ok(())
}
