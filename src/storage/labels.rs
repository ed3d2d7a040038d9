//! Display labels for hierarchy rows.
//!
//! A row only stores its parent's id, so a readable label is built by walking
//! up through the parents: "Springfield, Illinois United States", or
//! "Flatbush, Brooklyn, New York" for a sub-locality chain.

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::{Address, Level};

/// Levels labelled "{name}, {parent}", with the parent level and column.
fn chain_parent(level: Level) -> Option<(Level, &'static str)> {
    match level {
        Level::Admin4 => Some((Level::Admin3, "parent_id")),
        Level::Admin5 => Some((Level::Admin4, "parent_id")),
        Level::SubLocality1 => Some((Level::Locality, "locality_id")),
        Level::SubLocality2 => Some((Level::SubLocality1, "parent_id")),
        Level::SubLocality3 => Some((Level::SubLocality2, "parent_id")),
        Level::SubLocality4 => Some((Level::SubLocality3, "parent_id")),
        Level::SubLocality5 => Some((Level::SubLocality4, "parent_id")),
        Level::Neighborhood => Some((Level::Locality, "locality_id")),
        _ => None,
    }
}

/// Query producing the whole label of a level that ends a chain. Trailing
/// separators left by an unnamed country are trimmed.
fn root_sql(level: Level) -> String {
    match level {
        Level::State => "SELECT RTRIM(s.name || ', ' || c.name, ', ')
                         FROM states s JOIN countries c ON c.id = s.country_id
                         WHERE s.id = ?"
            .to_string(),
        Level::Admin2 => "SELECT RTRIM(a.name || ' - ' || s.name || ', ' || c.name, ', ')
                          FROM admin2 a
                          JOIN states s ON s.id = a.state_id
                          JOIN countries c ON c.id = s.country_id
                          WHERE a.id = ?"
            .to_string(),
        Level::Admin3 => "SELECT RTRIM(a.name || ', ' || s.code || ' - ' || c.name, ' -')
                          FROM admin3 a
                          JOIN states s ON s.id = a.state_id
                          JOIN countries c ON c.id = s.country_id
                          WHERE a.id = ?"
            .to_string(),
        Level::Locality => "SELECT CASE WHEN s.id IS NULL THEN l.name
                                 ELSE RTRIM(l.name || ', ' || s.name || ' ' || c.name) END
                            FROM localities l
                            LEFT JOIN states s ON s.id = l.state_id
                            LEFT JOIN countries c ON c.id = s.country_id
                            WHERE l.id = ?"
            .to_string(),
        Level::PostalCode => "SELECT RTRIM(p.code || ' - ' || c.name, ' -')
                              FROM postal_codes p JOIN countries c ON c.id = p.country_id
                              WHERE p.id = ?"
            .to_string(),
        Level::PostalCodeSuffix => "SELECT p.code || '-' || x.suffix
                                    FROM postal_code_suffixes x
                                    JOIN postal_codes p ON p.id = x.postal_code_id
                                    WHERE x.id = ?"
            .to_string(),
        _ => format!("SELECT name FROM {} WHERE id = ?", level.table()),
    }
}

/// Label of the `level` row with `id`, or `None` if there is no such row.
pub async fn node_label(
    pool: &SqlitePool,
    level: Level,
    id: i64,
) -> Result<Option<String>, DatabaseError> {
    let mut names: Vec<String> = Vec::new();
    let (mut level, mut id) = (level, id);

    while let Some((parent_level, parent_column)) = chain_parent(level) {
        let row = sqlx::query(&format!(
            "SELECT name, {parent_column} AS parent FROM {} WHERE id = ?",
            level.table()
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        let Some(row) = row else {
            break;
        };
        names.push(row.get("name"));
        match row.get::<Option<i64>, _>("parent") {
            Some(parent) => {
                level = parent_level;
                id = parent;
            }
            None => return Ok(Some(names.join(", "))),
        }
    }

    let root: Option<String> = sqlx::query_scalar(&root_sql(level))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    names.extend(root);

    if names.is_empty() {
        Ok(None)
    } else {
        Ok(Some(names.join(", ")))
    }
}

/// Labels of every hierarchy row `address` links to, top level first.
pub async fn address_labels(
    pool: &SqlitePool,
    address: &Address,
) -> Result<Vec<(Level, String)>, DatabaseError> {
    let links = [
        (Level::Country, address.country_id),
        (Level::State, address.state_id),
        (Level::Admin2, address.admin2_id),
        (Level::Admin3, address.admin3_id),
        (Level::Admin4, address.admin4_id),
        (Level::Admin5, address.admin5_id),
        (Level::Locality, address.locality_id),
        (Level::SubLocality1, address.sublocality1_id),
        (Level::SubLocality2, address.sublocality2_id),
        (Level::SubLocality3, address.sublocality3_id),
        (Level::SubLocality4, address.sublocality4_id),
        (Level::SubLocality5, address.sublocality5_id),
        (Level::Neighborhood, address.neighborhood_id),
        (Level::Airport, address.airport_id),
        (Level::PostalCode, address.postal_code_id),
        (Level::PostalCodeSuffix, address.postal_code_suffix_id),
    ];

    let mut labels = Vec::new();
    for (level, id) in links {
        let Some(id) = id else {
            continue;
        };
        if let Some(label) = node_label(pool, level, id).await? {
            labels.push((level, label));
        }
    }
    Ok(labels)
}
