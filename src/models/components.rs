//! Loosely-structured address components.
//!
//! The vocabulary follows the geocoder's component names. Absent keys are
//! empty strings, and so are keys sent as `null`. Only the coordinates are
//! typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Flat string mapping as submitted by a form or stored in hidden inputs.
pub type FormValues = BTreeMap<String, String>;

/// Named address components produced by a geocoding/autocomplete service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponents {
    #[serde(deserialize_with = "null_as_empty")]
    pub raw: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub country_code: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub state_code: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub locality: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sublocality: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sublocality_level_1: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sublocality_level_2: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sublocality_level_3: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sublocality_level_4: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sublocality_level_5: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub admin2: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub admin3: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub admin4: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub admin5: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub postal_code: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub postal_code_suffix: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub street_number: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub route: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub formatted: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub colloquial_area: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub airport: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub intersection: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Reads a string component, treating `null` as absent.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AddressComponents {
    /// Every string component, in the order hidden inputs are emitted.
    pub const KEYS: &'static [&'static str] = &[
        "country",
        "country_code",
        "route",
        "street_number",
        "locality",
        "sublocality",
        "sublocality_level_1",
        "sublocality_level_2",
        "sublocality_level_3",
        "sublocality_level_4",
        "sublocality_level_5",
        "postal_code",
        "postal_code_suffix",
        "state",
        "state_code",
        "admin2",
        "admin3",
        "admin4",
        "admin5",
        "colloquial_area",
        "neighborhood",
        "airport",
        "intersection",
        "formatted",
    ];

    /// Convenience constructor for a raw-text-only payload.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        AddressComponents {
            raw: raw.into(),
            ..Default::default()
        }
    }

    /// Name of the first sub-locality level.
    ///
    /// Geocoders report it either as `sublocality_level_1` or as a bare
    /// `sublocality`; the levelled name wins when it is non-empty.
    pub fn sublocality1(&self) -> &str {
        if self.sublocality_level_1.is_empty() {
            &self.sublocality
        } else {
            &self.sublocality_level_1
        }
    }

    /// Looks up a string component by its geocoder key.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        let value = match key {
            "raw" => &self.raw,
            "country" => &self.country,
            "country_code" => &self.country_code,
            "state" => &self.state,
            "state_code" => &self.state_code,
            "locality" => &self.locality,
            "sublocality" => &self.sublocality,
            "sublocality_level_1" => &self.sublocality_level_1,
            "sublocality_level_2" => &self.sublocality_level_2,
            "sublocality_level_3" => &self.sublocality_level_3,
            "sublocality_level_4" => &self.sublocality_level_4,
            "sublocality_level_5" => &self.sublocality_level_5,
            "admin2" => &self.admin2,
            "admin3" => &self.admin3,
            "admin4" => &self.admin4,
            "admin5" => &self.admin5,
            "postal_code" => &self.postal_code,
            "postal_code_suffix" => &self.postal_code_suffix,
            "street_number" => &self.street_number,
            "route" => &self.route,
            "formatted" => &self.formatted,
            "colloquial_area" => &self.colloquial_area,
            "neighborhood" => &self.neighborhood,
            "airport" => &self.airport,
            "intersection" => &self.intersection,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        let slot = match key {
            "raw" => &mut self.raw,
            "country" => &mut self.country,
            "country_code" => &mut self.country_code,
            "state" => &mut self.state,
            "state_code" => &mut self.state_code,
            "locality" => &mut self.locality,
            "sublocality" => &mut self.sublocality,
            "sublocality_level_1" => &mut self.sublocality_level_1,
            "sublocality_level_2" => &mut self.sublocality_level_2,
            "sublocality_level_3" => &mut self.sublocality_level_3,
            "sublocality_level_4" => &mut self.sublocality_level_4,
            "sublocality_level_5" => &mut self.sublocality_level_5,
            "admin2" => &mut self.admin2,
            "admin3" => &mut self.admin3,
            "admin4" => &mut self.admin4,
            "admin5" => &mut self.admin5,
            "postal_code" => &mut self.postal_code,
            "postal_code_suffix" => &mut self.postal_code_suffix,
            "street_number" => &mut self.street_number,
            "route" => &mut self.route,
            "formatted" => &mut self.formatted,
            "colloquial_area" => &mut self.colloquial_area,
            "neighborhood" => &mut self.neighborhood,
            "airport" => &mut self.airport,
            "intersection" => &mut self.intersection,
            _ => return None,
        };
        Some(slot)
    }

    /// Builds components from a flat string mapping.
    ///
    /// Unknown keys are ignored. Coordinates are left unset: they need
    /// validation that belongs to the caller (see `form::AddressFormField`).
    pub fn from_form_values(values: &FormValues) -> Self {
        let mut components = AddressComponents::default();
        for (key, value) in values {
            if let Some(slot) = components.slot_mut(key) {
                slot.clone_from(value);
            }
        }
        components
    }

    /// Flattens the components back into a string mapping, coordinates included.
    pub fn to_form_values(&self) -> FormValues {
        let mut values: FormValues = Self::KEYS
            .iter()
            .filter_map(|key| {
                self.value_of(key)
                    .map(|value| (key.to_string(), value.to_string()))
            })
            .collect();
        values.insert("raw".to_string(), self.raw.clone());
        values.insert(
            "latitude".to_string(),
            self.latitude.map(|v| v.to_string()).unwrap_or_default(),
        );
        values.insert(
            "longitude".to_string(),
            self.longitude.map(|v| v.to_string()).unwrap_or_default(),
        );
        values
    }
}
