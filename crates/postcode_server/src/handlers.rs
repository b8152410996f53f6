//! Request handlers, one module per resource.

pub mod cities;
pub mod offices;
pub mod postal_codes;
pub mod prefectures;
pub mod stats;

mod prelude;
