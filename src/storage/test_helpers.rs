//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup used across
//! unit tests in the crate.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses a single-connection in-memory database for fast test execution.
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

/// Drops the locality uniqueness key so tests can recreate legacy duplicates.
pub async fn drop_locality_unique_index(pool: &SqlitePool) {
    sqlx::query("DROP INDEX IF EXISTS idx_localities_name_state")
        .execute(pool)
        .await
        .expect("Failed to drop locality index");
}

/// Inserts a locality row directly, bypassing get-or-create.
pub async fn insert_locality(pool: &SqlitePool, name: &str, state_id: Option<i64>) -> i64 {
    sqlx::query_scalar("INSERT INTO localities (name, state_id) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(state_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert test locality")
}

/// Inserts an address row pointing at a locality and returns its id.
pub async fn insert_address(pool: &SqlitePool, raw: &str, locality_id: Option<i64>) -> i64 {
    sqlx::query_scalar("INSERT INTO addresses (raw, locality_id) VALUES (?, ?) RETURNING id")
        .bind(raw)
        .bind(locality_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert test address")
}
