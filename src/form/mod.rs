//! Form boundary for address inputs.
//!
//! An address is exchanged with a browser as one visible text input plus a
//! hidden input per geocoder component. `AddressWidget` describes that set of
//! inputs and reads it back; `AddressFormField` validates the result and
//! hands it to the normalizer. Markup rendering is left to the caller.

mod field;
mod widget;

pub use field::AddressFormField;
pub use widget::{AddressWidget, HiddenField, COMPONENTS};

use crate::error_handling::InitializationError;

/// Settings the autocomplete widget needs, checked when it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    api_key: String,
    show_map: bool,
}

impl FormConfig {
    /// Fails with `InitializationError::MissingApiKey` when `api_key` is blank.
    pub fn new(api_key: impl Into<String>, show_map: bool) -> Result<Self, InitializationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(InitializationError::MissingApiKey);
        }
        Ok(FormConfig { api_key, show_map })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn show_map(&self) -> bool {
        self.show_map
    }
}
