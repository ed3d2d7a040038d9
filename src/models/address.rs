use serde::Serialize;

/// A stored address.
///
/// `raw` is the identity of the row: the same raw text always maps to the same
/// address. Every hierarchy reference is optional and, once set, is never
/// replaced by a later import of the same raw text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: i64,
    pub street_number: String,
    pub route: String,
    pub locality_id: Option<i64>,
    pub sublocality1_id: Option<i64>,
    pub sublocality2_id: Option<i64>,
    pub sublocality3_id: Option<i64>,
    pub sublocality4_id: Option<i64>,
    pub sublocality5_id: Option<i64>,
    pub admin2_id: Option<i64>,
    pub admin3_id: Option<i64>,
    pub admin4_id: Option<i64>,
    pub admin5_id: Option<i64>,
    pub state_id: Option<i64>,
    pub country_id: Option<i64>,
    pub postal_code_id: Option<i64>,
    pub postal_code_suffix_id: Option<i64>,
    pub neighborhood_id: Option<i64>,
    pub airport_id: Option<i64>,
    pub raw: String,
    pub formatted: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub intersection: String,
    pub colloquial_area: String,
}

impl Address {
    /// True when no structured data has been attached to the raw text.
    pub fn is_bare(&self) -> bool {
        let bare = Address {
            id: self.id,
            raw: self.raw.clone(),
            ..Default::default()
        };
        *self == bare
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.formatted.is_empty() {
            f.write_str(&self.raw)
        } else {
            f.write_str(&self.formatted)
        }
    }
}
