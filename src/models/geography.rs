//! Geographic hierarchy rows.
//!
//! Each level is keyed by its name (or code) together with its parent, so the
//! same name under two different parents ("Springfield" in two states) is two
//! rows. The keys are enforced by unique indexes in `migrations/`.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// One level of the geographic hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Level {
    Country,
    State,
    Admin2,
    Admin3,
    Admin4,
    Admin5,
    Locality,
    #[strum(serialize = "sublocality1")]
    SubLocality1,
    #[strum(serialize = "sublocality2")]
    SubLocality2,
    #[strum(serialize = "sublocality3")]
    SubLocality3,
    #[strum(serialize = "sublocality4")]
    SubLocality4,
    #[strum(serialize = "sublocality5")]
    SubLocality5,
    Neighborhood,
    Airport,
    PostalCode,
    PostalCodeSuffix,
}

impl Level {
    /// Table holding rows of this level.
    pub fn table(self) -> &'static str {
        match self {
            Level::Country => "countries",
            Level::State => "states",
            Level::Admin2 => "admin2",
            Level::Admin3 => "admin3",
            Level::Admin4 => "admin4",
            Level::Admin5 => "admin5",
            Level::Locality => "localities",
            Level::SubLocality1 => "sublocalities1",
            Level::SubLocality2 => "sublocalities2",
            Level::SubLocality3 => "sublocalities3",
            Level::SubLocality4 => "sublocalities4",
            Level::SubLocality5 => "sublocalities5",
            Level::Neighborhood => "neighborhoods",
            Level::Airport => "airports",
            Level::PostalCode => "postal_codes",
            Level::PostalCodeSuffix => "postal_code_suffixes",
        }
    }
}

/// A country. The name is unique; the two-letter code is not (IT is shared).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// First-level administrative area (`administrative_area_level_1`).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct State {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub country_id: i64,
}

/// County-level area (`administrative_area_level_2`).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Admin2 {
    pub id: i64,
    pub name: String,
    pub state_id: i64,
}

/// Township or unincorporated area (`administrative_area_level_3`).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Admin3 {
    pub id: i64,
    pub name: String,
    pub state_id: i64,
    pub parent_id: Option<i64>,
}

/// A level whose only parent is the level directly above it.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ChildNode {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
}

pub type Admin4 = ChildNode;
pub type Admin5 = ChildNode;
pub type SubLocality2 = ChildNode;
pub type SubLocality3 = ChildNode;
pub type SubLocality4 = ChildNode;
pub type SubLocality5 = ChildNode;

/// A city or suburb. The state is optional: some geocoder results carry a
/// locality but no first-level area.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Locality {
    pub id: i64,
    pub name: String,
    pub state_id: Option<i64>,
}

/// Root of the sub-locality chain (`sublocality` / `sublocality_level_1`).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SubLocality1 {
    pub id: i64,
    pub name: String,
    pub locality_id: Option<i64>,
    pub admin2_id: Option<i64>,
    pub state_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Neighborhood {
    pub id: i64,
    pub name: String,
    pub locality_id: i64,
}

/// Airports are global; the name alone is the key.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Airport {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PostalCode {
    pub id: i64,
    pub code: String,
    pub country_id: i64,
}

/// Plus-four part of a US ZIP+4 code.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PostalCodeSuffix {
    pub id: i64,
    pub suffix: String,
    pub postal_code_id: i64,
}

// A row only knows its parent's id, so `Display` is the row's own name or
// code. `storage::labels::node_label` builds the full label.
macro_rules! display_name {
    ($($row:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $row {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.name)
                }
            }
        )*
    };
}

display_name!(
    Country,
    State,
    Admin2,
    Admin3,
    ChildNode,
    Locality,
    SubLocality1,
    Neighborhood,
    Airport,
);

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

impl std::fmt::Display for PostalCodeSuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.suffix)
    }
}
