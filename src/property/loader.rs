//! Load listings from spreadsheet exports (CSV)
//!
//! Listing exports never agree on column names, so columns are matched by
//! case-insensitive substring against a list of candidate names per field.
//! The first non-empty matching cell wins.

use super::normalize::clean_numeric;
use super::RawPropertyFacts;
use crate::error::IntakeError;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ADDRESS: &[&str] = &["address", "property_address", "street", "location"];
const CITY: &[&str] = &["city"];
const STATE: &[&str] = &["state"];
const ZIP: &[&str] = &["zip", "zipcode", "postal"];
const PROPERTY_TYPE: &[&str] = &["type", "property_type", "style"];
const PRICE: &[&str] = &["price", "purchase_price", "listing_price", "list_price", "asking_price"];
const RENT: &[&str] = &["rent", "monthly_rent", "rental_income"];
const BEDROOMS: &[&str] = &["bedrooms", "beds", "br"];
const BATHROOMS: &[&str] = &["bathrooms", "baths", "ba"];
const SQUARE_FOOTAGE: &[&str] = &["sqft", "square_feet", "square feet", "sq_ft", "sq ft", "size"];
const YEAR_BUILT: &[&str] = &["year_built", "built", "construction_year"];
const DESCRIPTION: &[&str] = &["description", "details", "notes"];
const LISTING_URL: &[&str] = &["url", "listing_url", "link"];
const ADR: &[&str] = &["adr", "average_daily_rate", "daily_rate"];
const OCCUPANCY: &[&str] = &["occupancy"];

/// Column indices per field, in candidate priority order
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    address: Vec<usize>,
    city: Vec<usize>,
    state: Vec<usize>,
    zip: Vec<usize>,
    property_type: Vec<usize>,
    price: Vec<usize>,
    rent: Vec<usize>,
    bedrooms: Vec<usize>,
    bathrooms: Vec<usize>,
    square_footage: Vec<usize>,
    year_built: Vec<usize>,
    description: Vec<usize>,
    listing_url: Vec<usize>,
    adr: Vec<usize>,
    occupancy: Vec<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let lowered: Vec<String> = headers.iter().map(str::to_lowercase).collect();
        let find = |candidates: &[&str]| -> Vec<usize> {
            let mut indices = Vec::new();
            for candidate in candidates {
                for (idx, header) in lowered.iter().enumerate() {
                    if header.contains(candidate) && !indices.contains(&idx) {
                        indices.push(idx);
                    }
                }
            }
            indices
        };

        Self {
            address: find(ADDRESS),
            city: find(CITY),
            state: find(STATE),
            zip: find(ZIP),
            property_type: find(PROPERTY_TYPE),
            price: find(PRICE),
            rent: find(RENT),
            bedrooms: find(BEDROOMS),
            bathrooms: find(BATHROOMS),
            square_footage: find(SQUARE_FOOTAGE),
            year_built: find(YEAR_BUILT),
            description: find(DESCRIPTION),
            listing_url: find(LISTING_URL),
            adr: find(ADR),
            occupancy: find(OCCUPANCY),
        }
    }

    fn to_facts(&self, record: &StringRecord) -> RawPropertyFacts {
        RawPropertyFacts {
            address: Some(first_text(record, &self.address).unwrap_or_else(|| "Unknown Address".to_string())),
            city: first_text(record, &self.city),
            state: first_text(record, &self.state),
            zip_code: first_text(record, &self.zip),
            property_type: first_text(record, &self.property_type),
            purchase_price: first_number(record, &self.price),
            monthly_rent: first_number(record, &self.rent),
            bedrooms: first_number(record, &self.bedrooms),
            bathrooms: first_number(record, &self.bathrooms),
            square_footage: first_number(record, &self.square_footage),
            year_built: first_number(record, &self.year_built),
            description: first_text(record, &self.description),
            listing_url: first_text(record, &self.listing_url),
            adr: first_number(record, &self.adr),
            occupancy_rate: first_number(record, &self.occupancy),
            funding_source: None,
        }
    }
}

fn first_text(record: &StringRecord, columns: &[usize]) -> Option<String> {
    columns
        .iter()
        .filter_map(|&idx| record.get(idx))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_number(record: &StringRecord, columns: &[usize]) -> Option<f64> {
    columns
        .iter()
        .filter_map(|&idx| record.get(idx))
        .find_map(clean_numeric)
}

/// Load every listing row from a CSV file
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<Vec<RawPropertyFacts>, IntakeError> {
    let path = path.as_ref();
    let listings = load_listings_from_reader(File::open(path)?)?;
    info!("loaded {} listing(s) from {}", listings.len(), path.display());
    Ok(listings)
}

/// Load listings from any reader (e.g., an upload buffer)
pub fn load_listings_from_reader<R: Read>(reader: R) -> Result<Vec<RawPropertyFacts>, IntakeError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.headers()?);
    let mut listings = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        listings.push(columns.to_facts(&record));
    }

    Ok(listings)
}

/// Load only the first listing row, as a single-property upload expects
pub fn load_first_listing<P: AsRef<Path>>(path: P) -> Result<RawPropertyFacts, IntakeError> {
    let path = path.as_ref();
    load_listings(path)?
        .into_iter()
        .next()
        .ok_or_else(|| IntakeError::Empty(path.display().to_string()))
}
