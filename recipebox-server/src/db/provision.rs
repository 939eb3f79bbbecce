//! Startup provisioning: make sure the database and table exist
//!
//! Each step lists what is there and only creates what is missing, so
//! running it against an already provisioned server changes nothing.

use sqlx::{Connection, PgConnection, PgPool};
use tracing::{debug, info};

use recipebox_core::DatabaseSection;

use super::error::StoreError;
use super::pool::{connect_options, create_pool};

/// Database used to inspect and create other databases
pub const MAINTENANCE_DATABASE: &str = "postgres";

/// What a provisioning run had to create
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub database_created: bool,
    pub table_created: bool,
}

/// Run the full check and return a pool connected to the target database.
pub async fn provision(config: &DatabaseSection) -> Result<(PgPool, ProvisionReport), StoreError> {
    info!(
        database = %config.name,
        table = %config.table,
        "Running provisioning check"
    );

    let database_created = ensure_database(&config.url, &config.name).await?;

    let options =
        connect_options(&config.url, &config.name).map_err(StoreError::provision("parse database url"))?;
    let pool = create_pool(options, config.max_connections)
        .await
        .map_err(StoreError::provision("connect to target database"))?;

    let table_created = ensure_table(&pool, &config.table).await?;

    Ok((
        pool,
        ProvisionReport {
            database_created,
            table_created,
        },
    ))
}

/// Create `name` on the server at `url` unless it already exists.
///
/// Returns whether the database was created.
pub async fn ensure_database(url: &str, name: &str) -> Result<bool, StoreError> {
    let options = connect_options(url, MAINTENANCE_DATABASE)
        .map_err(StoreError::provision("parse database url"))?;
    let mut conn = PgConnection::connect_with(&options)
        .await
        .map_err(StoreError::provision("connect to maintenance database"))?;

    let databases: Vec<String> = sqlx::query_scalar(
        "SELECT datname::text FROM pg_database WHERE NOT datistemplate ORDER BY datname",
    )
    .fetch_all(&mut conn)
    .await
    .map_err(StoreError::provision("list databases"))?;
    debug!(?databases, "Existing databases");

    let created = if contains(&databases, name) {
        info!(database = %name, "Database already exists");
        false
    } else {
        let sql = format!("CREATE DATABASE {}", quote_ident(name));
        sqlx::query(&sql)
            .execute(&mut conn)
            .await
            .map_err(StoreError::provision("create database"))?;
        info!(database = %name, "Created database");
        true
    };

    conn.close()
        .await
        .map_err(StoreError::provision("close maintenance connection"))?;
    Ok(created)
}

/// Create the recipe table in the pool's current schema unless it exists.
///
/// Returns whether the table was created.
pub async fn ensure_table(pool: &PgPool, table: &str) -> Result<bool, StoreError> {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::text FROM information_schema.tables WHERE table_schema = current_schema()",
    )
    .fetch_all(pool)
    .await
    .map_err(StoreError::provision("list tables"))?;
    debug!(?tables, "Existing tables");

    if contains(&tables, table) {
        info!(table = %table, "Table already exists");
        return Ok(false);
    }

    sqlx::query(&create_table_sql(table))
        .execute(pool)
        .await
        .map_err(StoreError::provision("create table"))?;
    info!(table = %table, "Created table");
    Ok(true)
}

fn create_table_sql(table: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            doc JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        quote_ident(table)
    )
}

fn contains(names: &[String], wanted: &str) -> bool {
    names.iter().any(|name| name == wanted)
}

/// Quote a Postgres identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
