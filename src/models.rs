//! Data models: hierarchy rows, address rows and the component mapping
//! exchanged with geocoders and forms.

mod address;
mod components;
mod geography;

pub use address::Address;
pub use components::{AddressComponents, FormValues};
pub use geography::{
    Admin2, Admin3, Admin4, Admin5, Airport, ChildNode, Country, Level, Locality, Neighborhood,
    PostalCode, PostalCodeSuffix, State, SubLocality1, SubLocality2, SubLocality3, SubLocality4,
    SubLocality5,
};
