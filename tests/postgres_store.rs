//! Runs the storage contract against both durable backends. Needs `TEST_DATABASE_URL`;
//! skipped otherwise. Each run works in its own schema and drops it afterwards.

mod support;

use portfolio_api::store::postgres::{connect_pool, quote_ident};
use portfolio_api::{DocumentStore, RelationalStore, Settings};
use sqlx::PgPool;

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            return None;
        }
    };
    Some(
        connect_pool(&url, &Settings::default())
            .await
            .expect("failed to connect to TEST_DATABASE_URL"),
    )
}

async fn drop_schema(pool: &PgPool, schema: &str) {
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", quote_ident(schema)))
        .execute(pool)
        .await
        .expect("failed to drop test schema");
}

#[tokio::test]
async fn relational_store_honours_storage_contract() {
    let Some(pool) = test_pool().await else { return };
    let schema = format!("portfolio_rel_{}", support::unique_suffix());
    let store = RelationalStore::open(pool.clone(), schema.clone()).await.unwrap();
    support::storage_contract(&store).await;

    // Reopening an existing schema is a no-op.
    RelationalStore::open(pool.clone(), schema.clone()).await.unwrap();
    drop_schema(&pool, &schema).await;
}

#[tokio::test]
async fn document_store_honours_storage_contract() {
    let Some(pool) = test_pool().await else { return };
    let schema = format!("portfolio_doc_{}", support::unique_suffix());
    let store = DocumentStore::open(pool.clone(), schema.clone()).await.unwrap();
    support::storage_contract(&store).await;

    DocumentStore::open(pool.clone(), schema.clone()).await.unwrap();
    drop_schema(&pool, &schema).await;
}
