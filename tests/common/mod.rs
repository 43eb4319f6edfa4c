#![allow(dead_code)]

use chrono::Utc;
use restaurant_api::{
    config::AppConfig,
    db::{connect, run_migrations},
    entity::{menu_items::ActiveModel as MenuItemActive, users::ActiveModel as UserActive},
    middleware::auth::AuthUser,
    models::{MenuCategory, Role},
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use std::str::FromStr;
use uuid::Uuid;

/// Connects to the test database, or returns `None` so the caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
            return Ok(None);
        }
    };

    let (pool, orm) = connect(&database_url).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_expires_hours: 1,
        allowed_origins: Vec::new(),
    };
    Ok(Some(AppState::new(pool, orm, config)))
}

// Rows are keyed by fresh UUIDs so test binaries can share one database.
pub async fn create_user(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    UserActive {
        id: Set(id),
        name: Set(format!("{role} {}", &id.to_string()[..8])),
        email: Set(format!("{id}@example.com")),
        password_hash: Set("unused".into()),
        role: Set(role),
        phone: Set(None),
        address: Set(None),
        is_active: Set(true),
        last_login_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser { user_id: id, role })
}

pub async fn create_menu_item(
    state: &AppState,
    name: &str,
    price: &str,
    available: bool,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    MenuItemActive {
        id: Set(id),
        name: Set(format!("{name} {id}")),
        description: Set(format!("{name} for flow tests")),
        price: Set(Decimal::from_str(price)?),
        category: Set(MenuCategory::MainCourse),
        image: Set("https://img.example.com/item.jpg".into()),
        is_vegetarian: Set(false),
        is_vegan: Set(false),
        is_gluten_free: Set(false),
        is_spicy: Set(false),
        allergens: Set(serde_json::json!([])),
        preparation_time: Set(15),
        is_available: Set(available),
        popularity: Set(0),
        tags: Set(serde_json::json!([])),
        customizations: Set(serde_json::json!([])),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(id)
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("decimal literal")
}
