//! geo_address library: geocoded address normalization
//!
//! Stores postal addresses against a normalized geographic hierarchy
//! (country, state, admin levels, locality, sub-localities, postal codes) in
//! SQLite. Component payloads from a geocoding service are resolved into that
//! hierarchy with get-or-create at every level, and re-imports of the same
//! raw text only fill in fields that are still empty.
//!
//! # Example
//!
//! ```no_run
//! use geo_address::{init_db_pool_with_path, run_migrations, to_address, AddressInput};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_db_pool_with_path(std::path::Path::new("./geo_address.db")).await?;
//! run_migrations(&pool).await?;
//!
//! let input = AddressInput::from_json(json!({
//!     "raw": "221B Baker St",
//!     "country": "United Kingdom",
//!     "country_code": "GB",
//!     "locality": "London",
//! }))?;
//! if let Some(address) = to_address(&pool, input).await? {
//!     println!("Stored address {}", address.id());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
mod dedupe;
mod error_handling;
pub mod form;
mod import;
pub mod initialization;
mod models;
mod normalize;
mod postal;
mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use dedupe::{dedupe_localities, DedupeReport};
pub use error_handling::{
    DatabaseError, FormError, ImportOutcome, ImportStats, InitializationError, NormalizeError,
};
pub use import::{import_file, import_line, import_lines};
pub use models::{
    Address, AddressComponents, Admin2, Admin3, Admin4, Admin5, Airport, ChildNode, Country,
    FormValues, Level, Locality, Neighborhood, PostalCode, PostalCodeSuffix, State, SubLocality1,
    SubLocality2, SubLocality3, SubLocality4, SubLocality5,
};
pub use normalize::{
    normalize_components, resolve_hierarchy, to_address, AddressInput, AddressRef,
    ResolvedHierarchy,
};
pub use postal::{split_zip4, PostalParts};
pub use storage::{
    address_labels, count_addresses, count_nodes, fetch_address, fetch_address_by_raw,
    fetch_node, init_db_pool_with_path, load_components, node_label, run_migrations,
};
