//! Property listing data structures and listing intake

mod data;
mod normalize;
pub mod loader;

pub use data::{PropertyFacts, RawPropertyFacts};
pub use normalize::{clean_numeric, normalize_property_type};
pub use loader::{load_first_listing, load_listings, load_listings_from_reader};
