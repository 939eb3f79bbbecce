//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Build connect options for `database` on the server named by `url`.
///
/// Any database already present in the URL is replaced.
pub fn connect_options(url: &str, database: &str) -> Result<PgConnectOptions, sqlx::Error> {
    Ok(PgConnectOptions::from_str(url)?.database(database))
}

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let options = connect_options("postgres://localhost:5432", "recipes")?;
/// let pool = create_pool(options, 5).await?;
/// ```
pub async fn create_pool(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}
