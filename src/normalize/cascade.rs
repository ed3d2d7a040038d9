//! The get-or-create cascade.
//!
//! Resolves each hierarchy level from the components, top down. The country
//! is always resolved, under its possibly empty name. Every other level is
//! only attempted when its own name is present and its parent resolved;
//! absence propagates downward.

use log::debug;
use sqlx::SqlitePool;

use crate::config::REGION_CODE_LEN;
use crate::error_handling::NormalizeError;
use crate::models::{Address, AddressComponents, Level};
use crate::postal::split_zip4;
use crate::storage::address::{fetch_address, save_address};
use crate::storage::nodes::{get_or_create, NodeKey};

use super::merge::fill_forward;

/// Ids of the hierarchy rows resolved for one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedHierarchy {
    pub country: Option<i64>,
    pub state: Option<i64>,
    pub postal_code: Option<i64>,
    pub postal_code_suffix: Option<i64>,
    pub admin2: Option<i64>,
    pub admin3: Option<i64>,
    pub admin4: Option<i64>,
    pub admin5: Option<i64>,
    pub locality: Option<i64>,
    pub sublocality1: Option<i64>,
    pub sublocality2: Option<i64>,
    pub sublocality3: Option<i64>,
    pub sublocality4: Option<i64>,
    pub sublocality5: Option<i64>,
    pub neighborhood: Option<i64>,
    pub airport: Option<i64>,
}

/// Truncates a region code to its stored length and uppercases it.
pub(crate) fn region_code(code: &str) -> String {
    code.chars()
        .take(REGION_CODE_LEN)
        .collect::<String>()
        .to_uppercase()
}

/// Resolves `name` under `parent` when both are present.
async fn child_of(
    pool: &SqlitePool,
    level: Level,
    name: &str,
    parent: Option<i64>,
) -> Result<Option<i64>, NormalizeError> {
    match parent {
        Some(parent_id) if !name.is_empty() => {
            Ok(Some(get_or_create(pool, &NodeKey::child(level, name, parent_id)).await?))
        }
        _ => Ok(None),
    }
}

/// Resolves every hierarchy level named in `c`.
pub async fn resolve_hierarchy(
    pool: &SqlitePool,
    c: &AddressComponents,
) -> Result<ResolvedHierarchy, NormalizeError> {
    let mut r = ResolvedHierarchy::default();
    let country_code = region_code(&c.country_code);

    // An unnamed country is still a country; states and postal codes hang
    // off it.
    let country_id = get_or_create(pool, &NodeKey::country(&c.country, &country_code)).await?;
    r.country = Some(country_id);

    if !c.state.is_empty() && !c.state_code.is_empty() {
        let state_code = region_code(&c.state_code);
        r.state =
            Some(get_or_create(pool, &NodeKey::state(&c.state, &state_code, country_id)).await?);
    }

    if !c.postal_code.is_empty() {
        let parts = split_zip4(&country_code, &c.postal_code);
        let (code, suffix) = match parts.suffix {
            Some(plus4) if c.postal_code_suffix.is_empty() => (parts.code, plus4),
            _ => (c.postal_code.as_str(), c.postal_code_suffix.as_str()),
        };
        let pc_id = get_or_create(pool, &NodeKey::postal_code(code, country_id)).await?;
        r.postal_code = Some(pc_id);
        if !suffix.is_empty() {
            r.postal_code_suffix =
                Some(get_or_create(pool, &NodeKey::postal_code_suffix(suffix, pc_id)).await?);
        }
    }

    if let Some(state_id) = r.state {
        if !c.admin2.is_empty() {
            r.admin2 = Some(get_or_create(pool, &NodeKey::admin2(&c.admin2, state_id)).await?);
        }
        if let Some(admin2_id) = r.admin2 {
            if !c.admin3.is_empty() {
                r.admin3 = Some(
                    get_or_create(pool, &NodeKey::admin3(&c.admin3, admin2_id, state_id)).await?,
                );
            }
        }
    }
    r.admin4 = child_of(pool, Level::Admin4, &c.admin4, r.admin3).await?;
    r.admin5 = child_of(pool, Level::Admin5, &c.admin5, r.admin4).await?;

    if !c.locality.is_empty() {
        r.locality = Some(get_or_create(pool, &NodeKey::locality(&c.locality, r.state)).await?);
    }
    let sublocality1 = c.sublocality1();
    if !sublocality1.is_empty() {
        r.sublocality1 = Some(
            get_or_create(
                pool,
                &NodeKey::sublocality1(sublocality1, r.locality, r.admin2, r.state),
            )
            .await?,
        );
    }
    r.sublocality2 = child_of(pool, Level::SubLocality2, &c.sublocality_level_2, r.sublocality1).await?;
    r.sublocality3 = child_of(pool, Level::SubLocality3, &c.sublocality_level_3, r.sublocality2).await?;
    r.sublocality4 = child_of(pool, Level::SubLocality4, &c.sublocality_level_4, r.sublocality3).await?;
    r.sublocality5 = child_of(pool, Level::SubLocality5, &c.sublocality_level_5, r.sublocality4).await?;

    if !c.airport.is_empty() {
        r.airport = Some(get_or_create(pool, &NodeKey::airport(&c.airport)).await?);
    }
    if let Some(locality_id) = r.locality {
        if !c.neighborhood.is_empty() {
            r.neighborhood =
                Some(get_or_create(pool, &NodeKey::neighborhood(&c.neighborhood, locality_id)).await?);
        }
    }

    Ok(r)
}

/// Produces or updates the address for a component payload.
///
/// Returns `Ok(None)` when the raw text is empty. A country code without a
/// country name is `NormalizeError::InconsistentInput`.
pub async fn normalize_components(
    pool: &SqlitePool,
    c: &AddressComponents,
) -> Result<Option<Address>, NormalizeError> {
    if c.raw.is_empty() {
        return Ok(None);
    }
    if c.country.is_empty() && !c.country_code.is_empty() {
        return Err(NormalizeError::InconsistentInput(c.country_code.clone()));
    }

    let resolved = resolve_hierarchy(pool, c).await?;

    let id = get_or_create(pool, &NodeKey::address(&c.raw)).await?;
    let mut address = fetch_address(pool, id)
        .await?
        .ok_or_else(|| NormalizeError::from(sqlx::Error::RowNotFound))?;

    if fill_forward(&mut address, c, &resolved) {
        save_address(pool, &address).await?;
        debug!("Filled in address {} ({})", address.id, address.raw);
    }

    Ok(Some(address))
}
