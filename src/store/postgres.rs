//! PostgreSQL plumbing shared by the document and relational backends: pool, database
//! creation, schema-qualified names, unique-violation detection.

use crate::config::Settings;
use crate::error::StoreError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Open a pool on `database_url` and probe it once. Creating the database first is best
/// effort: a failed bootstrap is logged and the target is still tried directly.
pub async fn connect_pool(database_url: &str, settings: &Settings) -> Result<PgPool, StoreError> {
    match parse_db_name_from_url(database_url) {
        Ok((admin_url, db_name)) => connect_pool_via(database_url, &admin_url, &db_name, settings).await,
        Err(e) => {
            tracing::warn!(error = %e, "cannot derive database name, skipping database bootstrap");
            open_pool(database_url, settings).await
        }
    }
}

async fn connect_pool_via(
    database_url: &str,
    admin_url: &str,
    db_name: &str,
    settings: &Settings,
) -> Result<PgPool, StoreError> {
    let timeout = Duration::from_secs(settings.database_connect_timeout_secs);
    if let Err(e) = ensure_database_exists(admin_url, db_name, timeout).await {
        tracing::warn!(database = %db_name, error = %e, "could not verify or create database, connecting directly");
    }
    open_pool(database_url, settings).await
}

async fn open_pool(database_url: &str, settings: &Settings) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .acquire_timeout(Duration::from_secs(settings.database_connect_timeout_secs))
        .connect(database_url)
        .await?;
    ping(&pool).await?;
    Ok(pool)
}

/// Create `db_name` through the admin database at `admin_url` when it does not exist.
pub async fn ensure_database_exists(admin_url: &str, db_name: &str, timeout: Duration) -> Result<(), StoreError> {
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(admin_url)?;
    let mut conn = tokio::time::timeout(timeout, opts.connect())
        .await
        .map_err(|_| StoreError::Db(sqlx::Error::PoolTimedOut))??;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| StoreError::Validation("DATABASE_URL: no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Schema-qualified table name, e.g. `"portfolio"."contacts"`.
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)))
        .execute(pool)
        .await?;
    Ok(())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
