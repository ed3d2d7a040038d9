//! Address normalization.
//!
//! `to_address` is the single entry point where external address data enters
//! the store. Every accepted input shape is an `AddressInput` variant, decided
//! once at the boundary.

mod cascade;
mod merge;

use log::warn;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::error_handling::NormalizeError;
use crate::models::{Address, AddressComponents};
use crate::storage::address::fetch_address;
use crate::storage::nodes::{get_or_create, NodeKey};

pub use cascade::{normalize_components, resolve_hierarchy, ResolvedHierarchy};

/// An address value as handed to the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressInput {
    /// No value.
    Empty,
    /// An address that is already stored.
    Existing(Address),
    /// The id of a stored address.
    Id(i64),
    /// Free text with no structure.
    Raw(String),
    /// A geocoded component payload.
    Components(AddressComponents),
}

impl AddressInput {
    /// Maps a JSON value onto an input variant.
    ///
    /// `null` is empty, integers are ids, strings are raw text and objects are
    /// component payloads. Anything else is `NormalizeError::InvalidValue`.
    pub fn from_json(value: Value) -> Result<AddressInput, NormalizeError> {
        match value {
            Value::Null => Ok(AddressInput::Empty),
            Value::Number(n) => n
                .as_i64()
                .map(AddressInput::Id)
                .ok_or_else(|| NormalizeError::InvalidValue(n.to_string())),
            Value::String(s) if s.is_empty() => Ok(AddressInput::Empty),
            Value::String(s) => Ok(AddressInput::Raw(s)),
            Value::Object(_) => serde_json::from_value::<AddressComponents>(value)
                .map(AddressInput::Components)
                .map_err(|e| NormalizeError::InvalidValue(e.to_string())),
            other @ (Value::Bool(_) | Value::Array(_)) => {
                Err(NormalizeError::InvalidValue(other.to_string()))
            }
        }
    }
}

impl From<Address> for AddressInput {
    fn from(address: Address) -> Self {
        AddressInput::Existing(address)
    }
}

impl From<AddressComponents> for AddressInput {
    fn from(components: AddressComponents) -> Self {
        AddressInput::Components(components)
    }
}

/// What the normalizer hands back: a loaded row, or an id passed through.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressRef {
    Record(Address),
    Id(i64),
}

impl AddressRef {
    pub fn id(&self) -> i64 {
        match self {
            AddressRef::Record(address) => address.id,
            AddressRef::Id(id) => *id,
        }
    }

    /// The loaded row, if this is not a bare id.
    pub fn record(&self) -> Option<&Address> {
        match self {
            AddressRef::Record(address) => Some(address),
            AddressRef::Id(_) => None,
        }
    }
}

/// Gets or creates the address keyed by `raw` alone, with no hierarchy.
async fn bare_address(pool: &SqlitePool, raw: &str) -> Result<Address, NormalizeError> {
    let id = get_or_create(pool, &NodeKey::address(raw)).await?;
    fetch_address(pool, id)
        .await?
        .ok_or_else(|| NormalizeError::from(sqlx::Error::RowNotFound))
}

/// A normalized address and whether the component cascade was bypassed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Normalized {
    pub address: Option<AddressRef>,
    /// A component payload was stored as raw text only.
    pub fell_back: bool,
}

pub(crate) async fn normalize_input(
    pool: &SqlitePool,
    input: AddressInput,
) -> Result<Normalized, NormalizeError> {
    let address = match input {
        AddressInput::Empty => None,
        AddressInput::Existing(address) => Some(AddressRef::Record(address)),
        AddressInput::Id(id) => Some(AddressRef::Id(id)),
        AddressInput::Raw(raw) if raw.is_empty() => None,
        AddressInput::Raw(raw) => Some(AddressRef::Record(bare_address(pool, &raw).await?)),
        AddressInput::Components(c) => match normalize_components(pool, &c).await {
            Ok(address) => address.map(AddressRef::Record),
            Err(NormalizeError::InconsistentInput(code)) => {
                warn!(
                    "Country code {:?} without a country name, storing {:?} as raw text only",
                    code, c.raw
                );
                return Ok(Normalized {
                    address: Some(AddressRef::Record(bare_address(pool, &c.raw).await?)),
                    fell_back: true,
                });
            }
            Err(e) => return Err(e),
        },
    };
    Ok(Normalized {
        address,
        fell_back: false,
    })
}

/// Converts `input` into a stored address.
///
/// Existing addresses and ids are returned untouched. Raw text is stored as a
/// bare address. Component payloads run through the hierarchy cascade; a
/// payload with a country code but no country name degrades to a bare address
/// keyed by its raw text.
pub async fn to_address(
    pool: &SqlitePool,
    input: AddressInput,
) -> Result<Option<AddressRef>, NormalizeError> {
    Ok(normalize_input(pool, input).await?.address)
}
