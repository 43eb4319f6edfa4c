use restaurant_api::{
    config::AppConfig,
    db::{connect, run_migrations},
    models::Role,
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let (pool, _orm) = connect(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "Admin", "admin@restaurant.com", "admin123", Role::Admin).await?;
    ensure_user(&pool, "Staff", "employee@restaurant.com", "employee123", Role::Employee).await?;
    let customer_id =
        ensure_user(&pool, "Customer", "customer@restaurant.com", "customer123", Role::Customer).await?;
    seed_menu(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Customer ID: {customer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let items = [
        ("Caesar Salad", "Romaine, parmesan, croutons and house dressing", "12.99", "appetizers", true, 10),
        ("Paneer Tikka", "Char-grilled cottage cheese with mint chutney", "249.50", "appetizers", true, 20),
        ("Butter Chicken", "Tandoori chicken simmered in a tomato butter gravy", "349.00", "main-course", false, 25),
        ("Dal Makhani", "Black lentils slow cooked overnight with cream", "229.00", "main-course", true, 20),
        ("Gulab Jamun", "Milk dumplings soaked in rose cardamom syrup", "99.00", "desserts", true, 5),
        ("Mango Lassi", "Chilled yoghurt smoothie with Alphonso mango", "89.00", "beverages", true, 5),
    ];

    for (name, description, price, category, vegetarian, minutes) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items
                (id, name, description, price, category, image, is_vegetarian, preparation_time)
            VALUES ($1, $2, $3, $4::numeric, $5, $6, $7, $8)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .bind(format!(
            "https://images.restaurant.example/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        ))
        .bind(vegetarian)
        .bind(minutes)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu");
    Ok(())
}
