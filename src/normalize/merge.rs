//! Fill-forward merge of a payload into an address row.
//!
//! A field is written only when the stored value is empty and the payload
//! supplies one. Populated fields are never overwritten.

use crate::models::{Address, AddressComponents};

use super::cascade::ResolvedHierarchy;

fn fill_text(slot: &mut String, value: &str) -> bool {
    if slot.is_empty() && !value.is_empty() {
        *slot = value.to_string();
        true
    } else {
        false
    }
}

fn fill<T: Copy>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match (&slot, value) {
        (None, Some(v)) => {
            *slot = Some(v);
            true
        }
        _ => false,
    }
}

/// Merges `c` and `r` into `address`. Returns true if anything changed.
pub(crate) fn fill_forward(
    address: &mut Address,
    c: &AddressComponents,
    r: &ResolvedHierarchy,
) -> bool {
    let filled = [
        fill_text(&mut address.street_number, &c.street_number),
        fill_text(&mut address.route, &c.route),
        fill(&mut address.locality_id, r.locality),
        fill(&mut address.sublocality1_id, r.sublocality1),
        fill(&mut address.sublocality2_id, r.sublocality2),
        fill(&mut address.sublocality3_id, r.sublocality3),
        fill(&mut address.sublocality4_id, r.sublocality4),
        fill(&mut address.sublocality5_id, r.sublocality5),
        fill(&mut address.admin2_id, r.admin2),
        fill(&mut address.admin3_id, r.admin3),
        fill(&mut address.admin4_id, r.admin4),
        fill(&mut address.admin5_id, r.admin5),
        fill(&mut address.state_id, r.state),
        fill(&mut address.postal_code_id, r.postal_code),
        fill(&mut address.postal_code_suffix_id, r.postal_code_suffix),
        fill(&mut address.country_id, r.country),
        fill_text(&mut address.formatted, &c.formatted),
        fill(&mut address.latitude, c.latitude),
        fill(&mut address.longitude, c.longitude),
        fill_text(&mut address.intersection, &c.intersection),
        fill_text(&mut address.colloquial_area, &c.colloquial_area),
        fill(&mut address.neighborhood_id, r.neighborhood),
        fill(&mut address.airport_id, r.airport),
    ];
    filled.iter().any(|changed| *changed)
}
