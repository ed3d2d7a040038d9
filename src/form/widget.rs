use std::collections::HashMap;

use serde::Serialize;

use crate::config::{
    ADDRESS_MAP_SCRIPT, ADDRESS_SCRIPT, GEOCOMPLETE_SCRIPT, MAPS_API_URL, WIDGET_CSS_CLASS,
};
use crate::models::FormValues;

use super::FormConfig;

/// Component name and the `data-geo` attribute the autocomplete script fills.
pub const COMPONENTS: &[(&str, &str)] = &[
    ("country", "country"),
    ("country_code", "country_short"),
    ("route", "route"),
    ("street_number", "street_number"),
    ("locality", "locality"),
    ("sublocality", "sublocality"),
    ("sublocality_level_1", "sublocality_level_1"),
    ("sublocality_level_2", "sublocality_level_2"),
    ("sublocality_level_3", "sublocality_level_3"),
    ("sublocality_level_4", "sublocality_level_4"),
    ("sublocality_level_5", "sublocality_level_5"),
    ("postal_code", "postal_code"),
    ("postal_code_suffix", "postal_code_suffix"),
    ("state", "administrative_area_level_1"),
    ("state_code", "administrative_area_level_1_short"),
    ("admin2", "administrative_area_level_2"),
    ("admin3", "administrative_area_level_3"),
    ("admin4", "administrative_area_level_4"),
    ("admin5", "administrative_area_level_5"),
    ("colloquial_area", "colloquial_area"),
    ("neighborhood", "neighborhood"),
    ("airport", "airport"),
    ("intersection", "intersection"),
    ("formatted", "formatted_address"),
    ("latitude", "lat"),
    ("longitude", "lng"),
    ("pk", "address_pk"),
];

/// One hidden input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenField {
    /// `<field>_<component>`
    pub name: String,
    pub geo: &'static str,
    pub value: String,
}

/// Autocomplete address input: a visible text box backed by hidden
/// per-component inputs.
#[derive(Debug, Clone)]
pub struct AddressWidget {
    config: FormConfig,
}

impl AddressWidget {
    pub fn new(config: FormConfig) -> Self {
        AddressWidget { config }
    }

    pub fn css_class(&self) -> &'static str {
        WIDGET_CSS_CLASS
    }

    /// Maps API script URL with the configured key.
    pub fn maps_api_url(&self) -> String {
        format!("{}{}", MAPS_API_URL, self.config.api_key())
    }

    /// Scripts to load, in order.
    pub fn media(&self) -> Vec<String> {
        let address_js = if self.config.show_map() {
            ADDRESS_MAP_SCRIPT
        } else {
            ADDRESS_SCRIPT
        };
        vec![
            self.maps_api_url(),
            GEOCOMPLETE_SCRIPT.to_string(),
            address_js.to_string(),
        ]
    }

    /// Hidden inputs for field `name`, one per component. Missing values are
    /// emitted empty.
    pub fn hidden_fields(&self, name: &str, values: &FormValues) -> Vec<HiddenField> {
        COMPONENTS
            .iter()
            .map(|&(component, geo)| HiddenField {
                name: format!("{}_{}", name, component),
                geo,
                value: values.get(component).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Rebuilds the component mapping from submitted form data.
    ///
    /// The visible input under `name` becomes `raw`. Returns `None` when it
    /// is missing or empty.
    pub fn value_from_form_data(
        &self,
        data: &HashMap<String, String>,
        name: &str,
    ) -> Option<FormValues> {
        let raw = data.get(name).filter(|raw| !raw.is_empty())?;
        let mut values: FormValues = COMPONENTS
            .iter()
            .map(|&(component, _)| {
                let submitted = data
                    .get(&format!("{}_{}", name, component))
                    .cloned()
                    .unwrap_or_default();
                (component.to_string(), submitted)
            })
            .collect();
        values.insert("raw".to_string(), raw.clone());
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(show_map: bool) -> AddressWidget {
        AddressWidget::new(FormConfig::new("test-key", show_map).expect("config"))
    }

    #[test]
    fn test_media_picks_script_by_map_flag() {
        let plain = widget(false).media();
        assert_eq!(
            plain[0],
            "https://maps.googleapis.com/maps/api/js?libraries=places&key=test-key"
        );
        assert_eq!(plain[1], GEOCOMPLETE_SCRIPT);
        assert_eq!(plain[2], ADDRESS_SCRIPT);
        assert_eq!(widget(true).media()[2], ADDRESS_MAP_SCRIPT);
    }

    #[test]
    fn test_hidden_fields_named_after_field() {
        let mut values = FormValues::new();
        values.insert("state".to_string(), "Illinois".to_string());
        values.insert("pk".to_string(), "12".to_string());

        let fields = widget(false).hidden_fields("home", &values);
        assert_eq!(fields.len(), COMPONENTS.len());

        let state = fields.iter().find(|f| f.name == "home_state").expect("state");
        assert_eq!(state.geo, "administrative_area_level_1");
        assert_eq!(state.value, "Illinois");

        let pk = fields.iter().find(|f| f.name == "home_pk").expect("pk");
        assert_eq!(pk.geo, "address_pk");
        assert_eq!(pk.value, "12");

        let route = fields.iter().find(|f| f.name == "home_route").expect("route");
        assert_eq!(route.value, "");
    }

    #[test]
    fn test_value_from_form_data() {
        let mut data = HashMap::new();
        data.insert("home".to_string(), "1 Main St".to_string());
        data.insert("home_route".to_string(), "Main St".to_string());
        data.insert("home_latitude".to_string(), "39.8".to_string());
        data.insert("other_route".to_string(), "Elm St".to_string());

        let values = widget(false)
            .value_from_form_data(&data, "home")
            .expect("values");
        assert_eq!(values.get("raw").map(String::as_str), Some("1 Main St"));
        assert_eq!(values.get("route").map(String::as_str), Some("Main St"));
        assert_eq!(values.get("latitude").map(String::as_str), Some("39.8"));
        assert_eq!(values.get("locality").map(String::as_str), Some(""));
        assert_eq!(values.len(), COMPONENTS.len() + 1);
    }

    #[test]
    fn test_empty_primary_input_yields_nothing() {
        let mut data = HashMap::new();
        data.insert("home".to_string(), String::new());
        data.insert("home_route".to_string(), "Main St".to_string());
        let w = widget(false);
        assert!(w.value_from_form_data(&data, "home").is_none());
        assert!(w.value_from_form_data(&data, "work").is_none());
    }
}
