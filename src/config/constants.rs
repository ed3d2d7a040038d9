//! Configuration constants.
//!
//! This module defines the constants used throughout the crate, including
//! storage defaults, normalization limits and widget asset locations.

/// Default SQLite database path.
pub const DB_PATH: &str = "./geo_address.db";

// Normalization
/// Country and state codes are stored with at most this many characters.
/// Geocoders return two-letter codes; longer values are truncated, not rejected.
pub const REGION_CODE_LEN: usize = 2;
/// Country code whose postal codes are split into ZIP + plus-four suffix.
pub const ZIP4_COUNTRY_CODE: &str = "US";

// Get-or-create retry strategy
/// Delay between attempts after a unique-constraint conflict.
pub const GET_OR_CREATE_RETRY_DELAY_MS: u64 = 10;
/// Retries after the first attempt. A conflicting writer has committed by the
/// time the constraint fires, so a single re-read normally resolves it.
pub const GET_OR_CREATE_MAX_RETRIES: usize = 3;

// Form widget
/// Environment variable holding the geocoding API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Maps JavaScript API with the places library; the key is appended.
pub const MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api/js?libraries=places&key=";
pub const GEOCOMPLETE_SCRIPT: &str = "js/jquery.geocomplete.min.js";
pub const ADDRESS_SCRIPT: &str = "address/js/address.js";
pub const ADDRESS_MAP_SCRIPT: &str = "address/js/address_map.js";
/// CSS class added to the visible address input.
pub const WIDGET_CSS_CLASS: &str = "address";
