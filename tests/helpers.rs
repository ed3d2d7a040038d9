// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

use geo_address::{init_db_pool_with_path, run_migrations, AddressComponents};

/// Creates a test database pool with migrations applied.
/// Uses a single-connection in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Creates a file-backed pool through the library's own initializer.
#[allow(dead_code)]
pub async fn create_test_pool_with_path(db_path: &Path) -> SqlitePool {
    let pool = init_db_pool_with_path(db_path)
        .await
        .expect("Failed to create test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Drops the locality uniqueness key so legacy duplicates can be inserted.
#[allow(dead_code)]
pub async fn drop_locality_unique_index(pool: &SqlitePool) {
    sqlx::query("DROP INDEX IF EXISTS idx_localities_name_state")
        .execute(pool)
        .await
        .expect("Failed to drop locality index");
}

/// Inserts a locality row directly and returns its id.
#[allow(dead_code)]
pub async fn insert_locality(pool: &SqlitePool, name: &str, state_id: Option<i64>) -> i64 {
    sqlx::query_scalar("INSERT INTO localities (name, state_id) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(state_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert test locality")
}

/// Inserts a locality row with a fixed id.
#[allow(dead_code)]
pub async fn insert_locality_with_id(pool: &SqlitePool, id: i64, name: &str, state_id: Option<i64>) {
    sqlx::query("INSERT INTO localities (id, name, state_id) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(state_id)
        .execute(pool)
        .await
        .expect("Failed to insert test locality");
}

/// Inserts an address row pointing at a locality and returns its id.
#[allow(dead_code)]
pub async fn insert_address(pool: &SqlitePool, raw: &str, locality_id: Option<i64>) -> i64 {
    sqlx::query_scalar("INSERT INTO addresses (raw, locality_id) VALUES (?, ?) RETURNING id")
        .bind(raw)
        .bind(locality_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert test address")
}

/// Reads the locality reference of an address.
#[allow(dead_code)]
pub async fn locality_of(pool: &SqlitePool, address_id: i64) -> Option<i64> {
    sqlx::query_scalar("SELECT locality_id FROM addresses WHERE id = ?")
        .bind(address_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read address")
}

/// A fully geocoded US payload.
#[allow(dead_code)]
pub fn springfield_payload() -> AddressComponents {
    AddressComponents {
        raw: "100 Main St, Springfield, IL 62701".to_string(),
        country: "United States".to_string(),
        country_code: "US".to_string(),
        state: "Illinois".to_string(),
        state_code: "IL".to_string(),
        locality: "Springfield".to_string(),
        postal_code: "62701".to_string(),
        street_number: "100".to_string(),
        route: "Main St".to_string(),
        formatted: "100 Main St, Springfield, IL 62701, USA".to_string(),
        latitude: Some(39.7990),
        longitude: Some(-89.6440),
        ..Default::default()
    }
}
