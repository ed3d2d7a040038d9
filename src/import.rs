//! Bulk import of address payloads.
//!
//! Input is one JSON value per line: a component object, a raw string, an
//! address id or `null`. Blank lines and `#` comments are skipped.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use sqlx::SqlitePool;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error_handling::{ImportOutcome, ImportStats, NormalizeError};
use crate::normalize::{normalize_input, AddressInput, AddressRef, Normalized};

/// Classifies the result of normalizing one input.
///
/// Only a component payload that went through the cascade counts as linked,
/// whatever the stored row already held.
fn outcome_of(
    input_was_components: bool,
    result: &Result<Normalized, NormalizeError>,
) -> ImportOutcome {
    match result {
        Ok(Normalized { address: None, .. }) => ImportOutcome::Empty,
        Ok(Normalized {
            address: Some(AddressRef::Id(_)),
            ..
        }) => ImportOutcome::PassThrough,
        Ok(Normalized {
            address: Some(AddressRef::Record(address)),
            fell_back: false,
        }) if input_was_components && !address.is_bare() => ImportOutcome::Linked,
        Ok(Normalized { .. }) => ImportOutcome::RawOnly,
        Err(NormalizeError::Database(_)) => ImportOutcome::StorageFailure,
        Err(_) => ImportOutcome::InvalidValue,
    }
}

/// Normalizes a single JSON line.
pub async fn import_line(pool: &SqlitePool, line: &str) -> ImportOutcome {
    let input = match serde_json::from_str(line)
        .map_err(|e| NormalizeError::InvalidValue(e.to_string()))
        .and_then(AddressInput::from_json)
    {
        Ok(input) => input,
        Err(e) => {
            warn!("Skipping line {:?}: {}", line, e);
            return ImportOutcome::InvalidValue;
        }
    };

    let is_components = matches!(input, AddressInput::Components(_));
    let result = normalize_input(pool, input).await;
    if let Err(e) = &result {
        warn!("Failed to import {:?}: {}", line, e);
    }
    outcome_of(is_components, &result)
}

/// Imports every line of `reader`, one at a time.
pub async fn import_lines<R>(pool: &SqlitePool, reader: R) -> ImportStats
where
    R: AsyncBufRead + Unpin,
{
    let stats = ImportStats::new();
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                stats.increment(ImportOutcome::InvalidValue);
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        stats.increment(import_line(pool, trimmed).await);
    }
    stats
}

/// Imports from a file, or from stdin when `path` is `-`.
pub async fn import_file(pool: &SqlitePool, path: &Path) -> Result<ImportStats> {
    let stats = if path.as_os_str() == "-" {
        info!("Reading addresses from stdin");
        import_lines(pool, BufReader::new(tokio::io::stdin())).await
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        import_lines(pool, BufReader::new(file)).await
    };

    info!(
        "Imported {} inputs: {} stored, {} failed",
        stats.total(),
        stats.stored(),
        stats.failed()
    );
    Ok(stats)
}
