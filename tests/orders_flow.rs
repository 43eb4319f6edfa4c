mod common;

use common::{create_menu_item, create_user, dec, setup_state};
use restaurant_api::{
    domain::OrderStatus,
    dto::orders::{
        CreateOrderRequest, OrderLineInput, OrderListQuery, RateOrderRequest,
        UpdateOrderStatusRequest,
    },
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Address, Role},
    routes::params::Pagination,
    services::order_service,
    state::AppState,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::HashSet;
use uuid::Uuid;

fn line(menu_item: Uuid, quantity: i32) -> OrderLineInput {
    OrderLineInput {
        menu_item,
        quantity,
        customizations: Vec::new(),
        special_instructions: None,
    }
}

fn order_request(order_type: &str, items: Vec<OrderLineInput>) -> CreateOrderRequest {
    let delivery_address = (order_type == "delivery").then(|| Address {
        street: Some("12 MG Road".into()),
        city: Some("Pune".into()),
        ..Address::default()
    });
    CreateOrderRequest {
        items,
        order_type: order_type.into(),
        payment_method: "cash".into(),
        delivery_address,
        special_instructions: None,
    }
}

async fn advance(state: &AppState, staff: &AuthUser, id: Uuid, steps: &[&str]) -> anyhow::Result<()> {
    for step in steps {
        order_service::update_order_status(
            state,
            staff,
            id,
            UpdateOrderStatusRequest {
                status: (*step).into(),
            },
        )
        .await?;
    }
    Ok(())
}

#[tokio::test]
async fn takeaway_and_delivery_orders_are_priced_and_numbered() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let caesar = create_menu_item(&state, "Caesar Salad", "12.99", true).await?;

    let takeaway = order_service::create_order(
        &state,
        &customer,
        order_request("takeaway", vec![line(caesar, 2)]),
    )
    .await?
    .data
    .expect("order");
    assert_eq!(takeaway.order.subtotal, dec("25.98"));
    assert_eq!(takeaway.order.tax, dec("1.30"));
    assert_eq!(takeaway.order.delivery_fee, dec("0"));
    assert_eq!(takeaway.order.total_amount, dec("27.28"));
    assert_eq!(takeaway.order.status, OrderStatus::Pending);
    assert_eq!(takeaway.items.len(), 1);
    assert_eq!(takeaway.items[0].unit_price, dec("12.99"));

    let today = chrono::Utc::now().format("%Y%m%d").to_string();
    assert!(takeaway.order.order_number.starts_with(&format!("ORD{today}")));
    assert_eq!(takeaway.order.order_number.len(), "ORD".len() + 8 + 3);

    let delivery = order_service::create_order(
        &state,
        &customer,
        order_request("delivery", vec![line(caesar, 2)]),
    )
    .await?
    .data
    .expect("order");
    assert_eq!(delivery.order.delivery_fee, dec("50"));
    assert_eq!(delivery.order.total_amount, dec("77.28"));
    assert_ne!(delivery.order.order_number, takeaway.order.order_number);

    Ok(())
}

#[tokio::test]
async fn unavailable_item_rejects_the_whole_order() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let soup = create_menu_item(&state, "Soup", "5.00", true).await?;
    let sorbet = create_menu_item(&state, "Sorbet", "4.00", false).await?;

    let err = order_service::create_order(
        &state,
        &customer,
        order_request("takeaway", vec![line(soup, 1), line(sorbet, 1)]),
    )
    .await
    .expect_err("unavailable item");
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("unavailable")), "{err:?}");

    let err = order_service::create_order(
        &state,
        &customer,
        order_request("takeaway", vec![line(Uuid::new_v4(), 1)]),
    )
    .await
    .expect_err("unknown item");
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    let stored = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer.user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(stored, 0);

    Ok(())
}

#[tokio::test]
async fn delivery_without_address_and_empty_orders_are_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let item = create_menu_item(&state, "Naan", "40.00", true).await?;

    let mut request = order_request("delivery", vec![line(item, 1)]);
    request.delivery_address = None;
    match order_service::create_order(&state, &customer, request).await {
        Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "deliveryAddress"),
        other => panic!("unexpected {other:?}"),
    }

    match order_service::create_order(&state, &customer, order_request("takeaway", vec![])).await {
        Err(AppError::Validation(fields)) => assert_eq!(fields[0].field, "items"),
        other => panic!("unexpected {other:?}"),
    }

    let staff = create_user(&state, Role::Employee).await?;
    let err = order_service::create_order(&state, &staff, order_request("takeaway", vec![line(item, 1)]))
        .await
        .expect_err("staff cannot order");
    assert!(matches!(err, AppError::Forbidden(_)));

    Ok(())
}

#[tokio::test]
async fn oversized_total_is_a_validation_error() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let caesar = create_menu_item(&state, "Caesar Salad", "12.99", true).await?;

    let err = order_service::create_order(
        &state,
        &customer,
        order_request("takeaway", vec![line(caesar, 1_000_000_000)]),
    )
    .await
    .expect_err("total too large");
    match err {
        AppError::Validation(fields) => assert_eq!(fields[0].field, "items"),
        other => panic!("unexpected {other:?}"),
    }

    let stored = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer.user_id))
        .count(&state.orm)
        .await?;
    assert_eq!(stored, 0);

    Ok(())
}

#[tokio::test]
async fn lifecycle_rating_and_ownership() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let owner = create_user(&state, Role::Customer).await?;
    let stranger = create_user(&state, Role::Customer).await?;
    let staff = create_user(&state, Role::Employee).await?;
    let item = create_menu_item(&state, "Biryani", "299.00", true).await?;

    let order = order_service::create_order(&state, &owner, order_request("delivery", vec![line(item, 1)]))
        .await?
        .data
        .expect("order")
        .order;

    // Ownership on reads.
    let err = order_service::get_order(&state, &stranger, order.id)
        .await
        .expect_err("not owner");
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(order_service::get_order(&state, &staff, order.id).await.is_ok());
    assert!(order_service::get_order(&state, &owner, order.id).await.is_ok());

    // Rating before delivery conflicts.
    let err = order_service::rate_order(
        &state,
        &owner,
        order.id,
        RateOrderRequest { rating: 5, review: None },
    )
    .await
    .expect_err("not delivered");
    assert!(matches!(err, AppError::Conflict(_)));

    // Skipping a step is illegal; delivery orders must go out for delivery.
    let err = order_service::update_order_status(
        &state,
        &staff,
        order.id,
        UpdateOrderStatusRequest { status: "ready".into() },
    )
    .await
    .expect_err("skip");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = order_service::update_order_status(
        &state,
        &staff,
        order.id,
        UpdateOrderStatusRequest { status: "teleported".into() },
    )
    .await
    .expect_err("unknown status");
    assert!(matches!(err, AppError::Validation(_)));

    advance(&state, &staff, order.id, &["confirmed", "preparing", "ready", "out_for_delivery"]).await?;
    let delivered = order_service::update_order_status(
        &state,
        &staff,
        order.id,
        UpdateOrderStatusRequest { status: "delivered".into() },
    )
    .await?
    .data
    .expect("order")
    .order;
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.actual_delivery_time.is_some());
    assert_eq!(delivered.assigned_staff_id, Some(staff.user_id));

    // Terminal: no more transitions.
    let err = order_service::update_order_status(
        &state,
        &staff,
        order.id,
        UpdateOrderStatusRequest { status: "cancelled".into() },
    )
    .await
    .expect_err("terminal");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = order_service::rate_order(
        &state,
        &stranger,
        order.id,
        RateOrderRequest { rating: 4, review: None },
    )
    .await
    .expect_err("stranger");
    assert!(matches!(err, AppError::Forbidden(_)));

    let rated = order_service::rate_order(
        &state,
        &owner,
        order.id,
        RateOrderRequest {
            rating: 4,
            review: Some("Hot and on time".into()),
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(rated.rating, Some(4));

    let err = order_service::rate_order(
        &state,
        &owner,
        order.id,
        RateOrderRequest { rating: 1, review: None },
    )
    .await
    .expect_err("second rating");
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("already")));

    Ok(())
}

#[tokio::test]
async fn listings_are_scoped_and_filtered() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let staff = create_user(&state, Role::Admin).await?;
    let item = create_menu_item(&state, "Idli", "60.00", true).await?;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = order_service::create_order(&state, &customer, order_request("dine_in", vec![line(item, 1)]))
            .await?
            .data
            .expect("order");
        ids.push(created.order.id);
    }
    advance(&state, &staff, ids[0], &["cancelled"]).await?;

    let page = order_service::list_orders(
        &state,
        &customer,
        Pagination::new(1, 2),
        OrderListQuery { status: None },
    )
    .await?;
    let meta = page.meta.expect("meta");
    assert_eq!(meta.total, Some(3));
    assert_eq!(meta.total_pages, Some(2));
    let orders = page.data.expect("orders").orders;
    assert_eq!(orders.len(), 2);
    // Newest first.
    assert_eq!(orders[0].order.id, ids[2]);
    assert!(orders.iter().all(|o| o.items.len() == 1));

    let cancelled = order_service::list_orders(
        &state,
        &customer,
        Pagination::default(),
        OrderListQuery {
            status: Some("cancelled".into()),
        },
    )
    .await?
    .data
    .expect("orders")
    .orders;
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].order.id, ids[0]);

    let err = order_service::list_all_orders(&state, &customer, Pagination::default(), OrderListQuery { status: None })
        .await
        .expect_err("customer");
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(
        order_service::list_all_orders(&state, &staff, Pagination::default(), OrderListQuery { status: None })
            .await
            .is_ok()
    );

    Ok(())
}

#[tokio::test]
async fn concurrent_orders_get_distinct_numbers() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let customer = create_user(&state, Role::Customer).await?;
    let item = create_menu_item(&state, "Chai", "20.00", true).await?;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        let customer = customer.clone();
        handles.push(tokio::spawn(async move {
            order_service::create_order(&state, &customer, order_request("takeaway", vec![line(item, 1)]))
                .await
                .map(|resp| resp.data.expect("order").order.order_number)
        }));
    }

    let mut numbers = HashSet::new();
    for handle in handles {
        let number = handle.await??;
        assert!(numbers.insert(number.clone()), "duplicate order number {number}");
    }
    assert_eq!(numbers.len(), 8);

    Ok(())
}
