use anyhow::Result;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Open the Postgres pool and wrap it in a SeaORM connection sharing the same pool.
pub async fn connect(database_url: &str) -> Result<(DbPool, OrmConn)> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    let orm = SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
    Ok((pool, orm))
}

/// Apply the SQL files in `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
