// storage/migrations.rs
// Database migration management

use sqlx::{Pool, Sqlite};

/// Runs SQLx migrations located in the `migrations/` directory.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), anyhow::Error> {
    let migrations_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;
    use crate::storage::test_helpers::create_test_pool;
    use strum::IntoEnumIterator;

    #[tokio::test]
    async fn test_every_level_has_a_table() {
        let pool = create_test_pool().await;
        for level in Level::iter() {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(level.table())
            .fetch_one(&pool)
            .await
            .expect("Failed to query sqlite_master");
            assert_eq!(count, 1, "missing table for {level}");
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = create_test_pool().await;
        assert!(run_migrations(&pool).await.is_ok());
    }
}
