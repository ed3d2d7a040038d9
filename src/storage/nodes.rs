//! Get-or-create for hierarchy rows.
//!
//! A row is described by a `NodeKey`: its table, the columns forming its
//! uniqueness key, and any extra columns written only when the row is created.
//! Lookups compare with `IS` so that a NULL parent matches a NULL parent.
//!
//! Two writers may both miss on the lookup and race to insert. The loser gets
//! a unique-constraint violation; the attempt is then retried, and the retry's
//! lookup finds the winner's row.

use std::time::Duration;

use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::{GET_OR_CREATE_MAX_RETRIES, GET_OR_CREATE_RETRY_DELAY_MS};
use crate::error_handling::DatabaseError;
use crate::models::Level;

/// A column value in a key or insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Column<'a> {
    Text(&'a str),
    Ref(Option<i64>),
}

/// Uniqueness key plus creation-only columns of one row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeKey<'a> {
    pub table: &'static str,
    pub key: Vec<(&'static str, Column<'a>)>,
    pub extra: Vec<(&'static str, Column<'a>)>,
}

impl<'a> NodeKey<'a> {
    fn level(level: Level, key: Vec<(&'static str, Column<'a>)>) -> Self {
        NodeKey {
            table: level.table(),
            key,
            extra: Vec::new(),
        }
    }

    fn with(mut self, column: &'static str, value: Column<'a>) -> Self {
        self.extra.push((column, value));
        self
    }

    /// Countries are keyed by name alone; the code is written on creation.
    pub fn country(name: &'a str, code: &'a str) -> Self {
        Self::level(Level::Country, vec![("name", Column::Text(name))])
            .with("code", Column::Text(code))
    }

    pub fn state(name: &'a str, code: &'a str, country_id: i64) -> Self {
        Self::level(
            Level::State,
            vec![
                ("name", Column::Text(name)),
                ("country_id", Column::Ref(Some(country_id))),
            ],
        )
        .with("code", Column::Text(code))
    }

    pub fn admin2(name: &'a str, state_id: i64) -> Self {
        Self::level(
            Level::Admin2,
            vec![
                ("name", Column::Text(name)),
                ("state_id", Column::Ref(Some(state_id))),
            ],
        )
    }

    pub fn admin3(name: &'a str, admin2_id: i64, state_id: i64) -> Self {
        Self::level(
            Level::Admin3,
            vec![
                ("name", Column::Text(name)),
                ("parent_id", Column::Ref(Some(admin2_id))),
            ],
        )
        .with("state_id", Column::Ref(Some(state_id)))
    }

    /// Levels whose only parent is the level above: Admin4/5, SubLocality2..5.
    pub fn child(level: Level, name: &'a str, parent_id: i64) -> Self {
        Self::level(
            level,
            vec![
                ("name", Column::Text(name)),
                ("parent_id", Column::Ref(Some(parent_id))),
            ],
        )
    }

    pub fn locality(name: &'a str, state_id: Option<i64>) -> Self {
        Self::level(
            Level::Locality,
            vec![
                ("name", Column::Text(name)),
                ("state_id", Column::Ref(state_id)),
            ],
        )
    }

    pub fn sublocality1(
        name: &'a str,
        locality_id: Option<i64>,
        admin2_id: Option<i64>,
        state_id: Option<i64>,
    ) -> Self {
        Self::level(
            Level::SubLocality1,
            vec![
                ("name", Column::Text(name)),
                ("locality_id", Column::Ref(locality_id)),
            ],
        )
        .with("admin2_id", Column::Ref(admin2_id))
        .with("state_id", Column::Ref(state_id))
    }

    pub fn neighborhood(name: &'a str, locality_id: i64) -> Self {
        Self::level(
            Level::Neighborhood,
            vec![
                ("name", Column::Text(name)),
                ("locality_id", Column::Ref(Some(locality_id))),
            ],
        )
    }

    pub fn airport(name: &'a str) -> Self {
        Self::level(Level::Airport, vec![("name", Column::Text(name))])
    }

    pub fn postal_code(code: &'a str, country_id: i64) -> Self {
        Self::level(
            Level::PostalCode,
            vec![
                ("code", Column::Text(code)),
                ("country_id", Column::Ref(Some(country_id))),
            ],
        )
    }

    pub fn postal_code_suffix(suffix: &'a str, postal_code_id: i64) -> Self {
        Self::level(
            Level::PostalCodeSuffix,
            vec![
                ("suffix", Column::Text(suffix)),
                ("postal_code_id", Column::Ref(Some(postal_code_id))),
            ],
        )
    }

    /// Addresses are keyed by their raw text alone.
    pub fn address(raw: &'a str) -> Self {
        NodeKey {
            table: "addresses",
            key: vec![("raw", Column::Text(raw))],
            extra: Vec::new(),
        }
    }

    fn select_sql(&self) -> String {
        let predicate = self
            .key
            .iter()
            .map(|(column, _)| format!("{column} IS ?"))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!("SELECT id FROM {} WHERE {} ORDER BY id LIMIT 1", self.table, predicate)
    }

    fn insert_sql(&self) -> String {
        let columns: Vec<&str> = self
            .key
            .iter()
            .chain(self.extra.iter())
            .map(|(column, _)| *column)
            .collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
            self.table,
            columns.join(", "),
            placeholders
        )
    }
}

async fn find_id(pool: &SqlitePool, node: &NodeKey<'_>) -> Result<Option<i64>, sqlx::Error> {
    let sql = node.select_sql();
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for (_, value) in &node.key {
        query = match *value {
            Column::Text(text) => query.bind(text),
            Column::Ref(id) => query.bind(id),
        };
    }
    query.fetch_optional(pool).await
}

async fn insert(pool: &SqlitePool, node: &NodeKey<'_>) -> Result<i64, sqlx::Error> {
    let sql = node.insert_sql();
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for (_, value) in node.key.iter().chain(node.extra.iter()) {
        query = match *value {
            Column::Text(text) => query.bind(text),
            Column::Ref(id) => query.bind(id),
        };
    }
    query.fetch_one(pool).await
}

async fn attempt(pool: &SqlitePool, node: &NodeKey<'_>) -> Result<i64, sqlx::Error> {
    if let Some(id) = find_id(pool, node).await? {
        return Ok(id);
    }
    let id = insert(pool, node).await?;
    debug!("Created {} row {} for {:?}", node.table, id, node.key);
    Ok(id)
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Returns the id of the row matching `node`'s key, creating it if absent.
pub(crate) async fn get_or_create(
    pool: &SqlitePool,
    node: &NodeKey<'_>,
) -> Result<i64, DatabaseError> {
    let strategy = FixedInterval::new(Duration::from_millis(GET_OR_CREATE_RETRY_DELAY_MS))
        .take(GET_OR_CREATE_MAX_RETRIES);

    RetryIf::start(strategy, || attempt(pool, node), is_unique_violation)
        .await
        .map_err(DatabaseError::SqlError)
}

/// Fetches one hierarchy row by id.
pub async fn fetch_node<T>(
    pool: &SqlitePool,
    level: Level,
    id: i64,
) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!("SELECT * FROM {} WHERE id = ?", level.table());
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Number of rows stored at a hierarchy level.
pub async fn count_nodes(pool: &SqlitePool, level: Level) -> Result<i64, DatabaseError> {
    let sql = format!("SELECT COUNT(*) FROM {}", level.table());
    let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?;
    Ok(count)
}
