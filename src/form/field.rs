use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::error_handling::FormError;
use crate::models::{AddressComponents, FormValues};
use crate::normalize::{to_address, AddressInput, AddressRef};

use super::AddressWidget;

/// Form field that turns a submitted address into a stored one.
#[derive(Debug, Clone)]
pub struct AddressFormField {
    widget: AddressWidget,
}

/// Parses a coordinate. Blank is `None`.
fn coordinate(values: &FormValues, field: &'static str) -> Result<Option<f64>, FormError> {
    match values.get(field).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .map(Some)
            .map_err(|_| FormError::InvalidNumber { field }),
    }
}

impl AddressFormField {
    pub fn new(widget: AddressWidget) -> Self {
        AddressFormField { widget }
    }

    pub fn widget(&self) -> &AddressWidget {
        &self.widget
    }

    /// Validates the submitted values into a component payload.
    pub fn clean_components(&self, values: &FormValues) -> Result<AddressComponents, FormError> {
        let mut components = AddressComponents::from_form_values(values);
        components.latitude = coordinate(values, "latitude")?;
        components.longitude = coordinate(values, "longitude")?;
        Ok(components)
    }

    /// Validates `value` and normalizes it. `None` stays `None`.
    pub async fn clean(
        &self,
        pool: &SqlitePool,
        value: Option<FormValues>,
    ) -> Result<Option<AddressRef>, FormError> {
        let Some(values) = value else {
            return Ok(None);
        };
        let components = self.clean_components(&values)?;
        Ok(to_address(pool, AddressInput::Components(components)).await?)
    }

    /// Reads field `name` out of submitted form data and cleans it.
    pub async fn clean_form_data(
        &self,
        pool: &SqlitePool,
        data: &HashMap<String, String>,
        name: &str,
    ) -> Result<Option<AddressRef>, FormError> {
        let value = self.widget.value_from_form_data(data, name);
        self.clean(pool, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormConfig;
    use crate::storage::count_addresses;
    use crate::storage::test_helpers::create_test_pool;

    fn field() -> AddressFormField {
        AddressFormField::new(AddressWidget::new(
            FormConfig::new("test-key", false).expect("config"),
        ))
    }

    fn values(pairs: &[(&str, &str)]) -> FormValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_coordinates_parsed() {
        let c = field()
            .clean_components(&values(&[
                ("raw", "1 Main St"),
                ("latitude", "39.78"),
                ("longitude", " -89.65 "),
            ]))
            .expect("valid");
        assert_eq!(c.latitude, Some(39.78));
        assert_eq!(c.longitude, Some(-89.65));
    }

    #[test]
    fn test_blank_coordinates_are_none() {
        let c = field()
            .clean_components(&values(&[("raw", "1 Main St"), ("latitude", "")]))
            .expect("valid");
        assert_eq!(c.latitude, None);
        assert_eq!(c.longitude, None);
    }

    #[test]
    fn test_garbage_coordinate_names_field() {
        let err = field()
            .clean_components(&values(&[("latitude", "1.0"), ("longitude", "west")]))
            .expect_err("invalid");
        assert!(matches!(err, FormError::InvalidNumber { field: "longitude" }));
    }

    #[tokio::test]
    async fn test_clean_none_is_none() {
        let pool = create_test_pool().await;
        assert!(field().clean(&pool, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clean_form_data_stores_address() {
        let pool = create_test_pool().await;
        let mut data = HashMap::new();
        data.insert("home".to_string(), "221B Baker St".to_string());
        data.insert("home_country".to_string(), "United Kingdom".to_string());
        data.insert("home_country_code".to_string(), "GB".to_string());
        data.insert("home_locality".to_string(), "London".to_string());
        data.insert("home_latitude".to_string(), "51.5237".to_string());

        let address = field()
            .clean_form_data(&pool, &data, "home")
            .await
            .expect("clean")
            .expect("address");
        let record = address.record().expect("record");
        assert_eq!(record.raw, "221B Baker St");
        assert!(record.locality_id.is_some());
        assert_eq!(record.latitude, Some(51.5237));
        assert_eq!(count_addresses(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_coordinate_stores_nothing() {
        let pool = create_test_pool().await;
        let result = field()
            .clean(&pool, Some(values(&[("raw", "x"), ("latitude", "north")])))
            .await;
        assert!(matches!(result, Err(FormError::InvalidNumber { field: "latitude" })));
        assert_eq!(count_addresses(&pool).await.unwrap(), 0);
    }
}
