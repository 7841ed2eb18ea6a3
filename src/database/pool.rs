use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create the shared connection pool. Connection is lazy so the process can
/// start (and report degraded health) while the database is unreachable.
pub fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Pings the database to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
