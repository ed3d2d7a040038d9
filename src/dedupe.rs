//! Locality deduplication.
//!
//! Collapses Locality rows that share a (name, state) key onto the row with
//! the lowest id. Databases created before the uniqueness index existed, or
//! written by racing creators, can hold such duplicates.

use log::{debug, info};
use serde::Serialize;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::error_handling::DatabaseError;

/// Counts from one deduplication pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeReport {
    /// Addresses with a locality reference that were examined.
    pub addresses_scanned: usize,
    /// Addresses moved from a duplicate locality to the canonical one.
    pub addresses_repointed: usize,
    /// Duplicate locality rows removed.
    pub localities_deleted: usize,
}

/// Sub-locality tables from the first level down, with the address column
/// referencing each.
const SUBLOCALITY_LEVELS: [(&str, &str); 5] = [
    ("sublocalities1", "sublocality1_id"),
    ("sublocalities2", "sublocality2_id"),
    ("sublocalities3", "sublocality3_id"),
    ("sublocalities4", "sublocality4_id"),
    ("sublocalities5", "sublocality5_id"),
];

/// Locality ids sharing the key of the locality `address_id` points at,
/// lowest first. Empty when the address has no locality.
async fn locality_group(pool: &SqlitePool, address_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT l.name, l.state_id
         FROM addresses a JOIN localities l ON l.id = a.locality_id
         WHERE a.id = ?",
    )
    .bind(address_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(Vec::new());
    };
    let name: String = row.get("name");
    let state_id: Option<i64> = row.get("state_id");

    sqlx::query_scalar("SELECT id FROM localities WHERE name = ? AND state_id IS ? ORDER BY id")
        .bind(name)
        .bind(state_id)
        .fetch_all(pool)
        .await
}

/// (id, name) of every row in `table` under `parent`.
async fn children_of(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    parent_column: &str,
    parent: i64,
) -> Result<Vec<(i64, String)>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT id, name FROM {table} WHERE {parent_column} = ? ORDER BY id"
    ))
    .bind(parent)
    .fetch_all(&mut **tx)
    .await
}

/// Row in `table` under `parent` carrying `name`, if any.
async fn sibling_named(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    parent_column: &str,
    parent: i64,
    name: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar(&format!(
        "SELECT id FROM {table} WHERE {parent_column} = ? AND name = ? ORDER BY id LIMIT 1"
    ))
    .bind(parent)
    .bind(name)
    .fetch_optional(&mut **tx)
    .await
}

async fn reparent(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    parent_column: &str,
    parent: i64,
    id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("UPDATE {table} SET {parent_column} = ? WHERE id = ?"))
        .bind(parent)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn repoint_addresses(
    tx: &mut Transaction<'_, Sqlite>,
    column: &str,
    to: i64,
    from: i64,
) -> Result<u64, sqlx::Error> {
    Ok(
        sqlx::query(&format!("UPDATE addresses SET {column} = ? WHERE {column} = ?"))
            .bind(to)
            .bind(from)
            .execute(&mut **tx)
            .await?
            .rows_affected(),
    )
}

/// Moves the sub-locality tree under `duplicate` onto `canonical`.
///
/// A row with no same-named sibling under the new parent is re-parented and
/// keeps its id. A row with one is merged: its addresses and children move to
/// the sibling, level by level, and only then is it deleted. Deletion runs
/// deepest first so nothing cascades.
async fn merge_sublocalities(
    tx: &mut Transaction<'_, Sqlite>,
    canonical: i64,
    duplicate: i64,
) -> Result<(), sqlx::Error> {
    // (level, keep, drop)
    let mut pending: Vec<(usize, i64, i64)> = Vec::new();
    let mut merged: Vec<(usize, i64)> = Vec::new();

    let (first_table, _) = SUBLOCALITY_LEVELS[0];
    for (id, name) in children_of(tx, first_table, "locality_id", duplicate).await? {
        match sibling_named(tx, first_table, "locality_id", canonical, &name).await? {
            Some(keep) => pending.push((0, keep, id)),
            None => reparent(tx, first_table, "locality_id", canonical, id).await?,
        }
    }

    while let Some((level, keep, drop)) = pending.pop() {
        let (_, column) = SUBLOCALITY_LEVELS[level];
        repoint_addresses(tx, column, keep, drop).await?;

        if let Some(&(child_table, _)) = SUBLOCALITY_LEVELS.get(level + 1) {
            for (id, name) in children_of(tx, child_table, "parent_id", drop).await? {
                match sibling_named(tx, child_table, "parent_id", keep, &name).await? {
                    Some(sibling) => pending.push((level + 1, sibling, id)),
                    None => reparent(tx, child_table, "parent_id", keep, id).await?,
                }
            }
        }
        merged.push((level, drop));
    }

    for (level, drop) in merged.into_iter().rev() {
        let (table, _) = SUBLOCALITY_LEVELS[level];
        sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(drop)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Moves everything that references `duplicate` onto `canonical`, then
/// deletes `duplicate`. Returns (addresses repointed, rows deleted).
async fn fold_into(
    tx: &mut Transaction<'_, Sqlite>,
    canonical: i64,
    duplicate: i64,
) -> Result<(u64, u64), sqlx::Error> {
    let repointed = repoint_addresses(tx, "locality_id", canonical, duplicate).await?;

    for (id, name) in children_of(tx, "neighborhoods", "locality_id", duplicate).await? {
        match sibling_named(tx, "neighborhoods", "locality_id", canonical, &name).await? {
            Some(keep) => {
                repoint_addresses(tx, "neighborhood_id", keep, id).await?;
                sqlx::query("DELETE FROM neighborhoods WHERE id = ?")
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
            }
            None => reparent(tx, "neighborhoods", "locality_id", canonical, id).await?,
        }
    }

    merge_sublocalities(tx, canonical, duplicate).await?;

    let deleted = sqlx::query("DELETE FROM localities WHERE id = ?")
        .bind(duplicate)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    Ok((repointed, deleted))
}

/// Runs one deduplication pass over every address with a locality.
///
/// Each duplicate group is folded in its own transaction. A second pass over
/// the same data finds nothing to do.
pub async fn dedupe_localities(pool: &SqlitePool) -> Result<DedupeReport, DatabaseError> {
    let address_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM addresses WHERE locality_id IS NOT NULL ORDER BY id")
            .fetch_all(pool)
            .await?;

    let mut report = DedupeReport {
        addresses_scanned: address_ids.len(),
        ..Default::default()
    };

    for address_id in address_ids {
        let group = locality_group(pool, address_id).await?;
        let Some((&canonical, duplicates)) = group.split_first() else {
            continue;
        };
        if duplicates.is_empty() {
            continue;
        }

        let mut tx = pool.begin().await?;
        for &duplicate in duplicates {
            let (repointed, deleted) = fold_into(&mut tx, canonical, duplicate).await?;
            report.addresses_repointed += repointed as usize;
            report.localities_deleted += deleted as usize;
            debug!(
                "Folded locality {} into {} ({} addresses)",
                duplicate, canonical, repointed
            );
        }
        tx.commit().await?;
    }

    info!(
        "Locality dedupe: {} addresses scanned, {} repointed, {} localities deleted",
        report.addresses_scanned, report.addresses_repointed, report.localities_deleted
    );
    Ok(report)
}
