//! Property listing records: the loose intake shape and the canonical facts

use super::normalize::normalize_property_type;
use crate::analysis::FundingSource;
use crate::lenient;
use serde::{Deserialize, Serialize};

/// Listing facts exactly as a parser or form submitted them
///
/// Accepts camelCase and snake_case spellings for every field. Nothing here
/// is trusted; [`RawPropertyFacts::normalize`] produces the canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPropertyFacts {
    #[serde(default, alias = "property_address", deserialize_with = "lenient::text")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,

    #[serde(default, alias = "zip_code", alias = "zip", deserialize_with = "lenient::text")]
    pub zip_code: Option<String>,

    #[serde(default, alias = "property_type", deserialize_with = "lenient::text")]
    pub property_type: Option<String>,

    #[serde(default, alias = "purchase_price", deserialize_with = "lenient::number")]
    pub purchase_price: Option<f64>,

    #[serde(default, alias = "monthly_rent", deserialize_with = "lenient::number")]
    pub monthly_rent: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub bedrooms: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub bathrooms: Option<f64>,

    #[serde(default, alias = "square_footage", deserialize_with = "lenient::number")]
    pub square_footage: Option<f64>,

    #[serde(default, alias = "year_built", deserialize_with = "lenient::number")]
    pub year_built: Option<f64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,

    #[serde(default, alias = "listing_url", deserialize_with = "lenient::text")]
    pub listing_url: Option<String>,

    /// Average daily rate for short-term rental use
    #[serde(default, deserialize_with = "lenient::number")]
    pub adr: Option<f64>,

    /// Occupancy as a fraction (0.65) or a percentage (65)
    #[serde(default, alias = "occupancy_rate", deserialize_with = "lenient::number")]
    pub occupancy_rate: Option<f64>,

    #[serde(default, alias = "funding_source", deserialize_with = "lenient::text")]
    pub funding_source: Option<String>,
}

impl RawPropertyFacts {
    /// Map the loose record onto canonical [`PropertyFacts`]
    ///
    /// Missing numbers become 0 and negative purchase prices clamp to 0.
    /// Occupancy is kept as submitted; percentage handling happens in the
    /// engine so directly-constructed facts get the same treatment.
    pub fn normalize(&self) -> PropertyFacts {
        PropertyFacts {
            address: self.address.clone().unwrap_or_default(),
            city: text_or(&self.city, "Unknown"),
            state: text_or(&self.state, "Unknown"),
            zip_code: text_or(&self.zip_code, "00000"),
            property_type: normalize_property_type(self.property_type.as_deref().unwrap_or("")),
            purchase_price: self.purchase_price.unwrap_or(0.0).max(0.0),
            monthly_rent: self.monthly_rent.unwrap_or(0.0),
            bedrooms: whole(self.bedrooms),
            bathrooms: self.bathrooms.unwrap_or(0.0).max(0.0),
            square_footage: whole(self.square_footage),
            year_built: whole(self.year_built),
            description: self.description.clone().unwrap_or_default(),
            listing_url: self.listing_url.clone().unwrap_or_default(),
            adr: self.adr,
            occupancy_rate: self.occupancy_rate,
            funding_source: self.funding_source.as_deref().map(FundingSource::from_lenient),
        }
    }
}

fn text_or(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

fn whole(value: Option<f64>) -> u32 {
    value.unwrap_or(0.0).max(0.0) as u32
}

/// Canonical listing facts consumed by the analysis engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFacts {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,

    /// Normalized type, e.g. `single-family`
    pub property_type: String,

    pub purchase_price: f64,

    /// Long-term monthly rent
    pub monthly_rent: f64,

    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_footage: u32,
    pub year_built: u32,

    /// Pass-through, never used in calculations
    pub description: String,

    /// Pass-through, never used in calculations
    pub listing_url: String,

    pub adr: Option<f64>,
    pub occupancy_rate: Option<f64>,

    /// Financing embedded in the listing payload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_source: Option<FundingSource>,
}

impl PropertyFacts {
    /// Create facts for the fields the engine actually reads
    pub fn new(purchase_price: f64, monthly_rent: f64) -> Self {
        Self {
            purchase_price,
            monthly_rent,
            ..Self::default()
        }
    }

    /// Attach short-term-rental figures
    pub fn with_str(mut self, adr: f64, occupancy_rate: f64) -> Self {
        self.adr = Some(adr);
        self.occupancy_rate = Some(occupancy_rate);
        self
    }
}

impl Default for PropertyFacts {
    fn default() -> Self {
        Self {
            address: String::new(),
            city: "Unknown".to_string(),
            state: "Unknown".to_string(),
            zip_code: "00000".to_string(),
            property_type: "single-family".to_string(),
            purchase_price: 0.0,
            monthly_rent: 0.0,
            bedrooms: 0,
            bathrooms: 0.0,
            square_footage: 0,
            year_built: 0,
            description: String::new(),
            listing_url: String::new(),
            adr: None,
            occupancy_rate: None,
            funding_source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_and_snake_case_are_interchangeable() {
        let camel: RawPropertyFacts = serde_json::from_str(
            r#"{"address": "12 Oak St", "zipCode": "30301", "propertyType": "SFR",
                "purchasePrice": 250000, "monthlyRent": 2600, "squareFootage": 1450,
                "yearBuilt": 1998, "listingUrl": "https://example.com/12-oak",
                "adr": 140, "occupancyRate": 70}"#,
        )
        .unwrap();
        let snake: RawPropertyFacts = serde_json::from_str(
            r#"{"address": "12 Oak St", "zip_code": "30301", "property_type": "SFR",
                "purchase_price": 250000, "monthly_rent": 2600, "square_footage": 1450,
                "year_built": 1998, "listing_url": "https://example.com/12-oak",
                "adr": 140, "occupancy_rate": 70}"#,
        )
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.normalize(), snake.normalize());
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let facts = RawPropertyFacts::default().normalize();

        assert_eq!(facts.city, "Unknown");
        assert_eq!(facts.state, "Unknown");
        assert_eq!(facts.zip_code, "00000");
        assert_eq!(facts.property_type, "single-family");
        assert_eq!(facts.purchase_price, 0.0);
        assert_eq!(facts.monthly_rent, 0.0);
        assert_eq!(facts.funding_source, None);
    }

    #[test]
    fn test_normalize_coerces_numbers() {
        let raw: RawPropertyFacts = serde_json::from_str(
            r#"{"purchase_price": "$189,900", "bedrooms": "3", "bathrooms": 2.5,
                "square_footage": "1,320", "purchasePriceNote": "ignored"}"#,
        )
        .unwrap();
        let facts = raw.normalize();

        assert_eq!(facts.purchase_price, 189_900.0);
        assert_eq!(facts.bedrooms, 3);
        assert_eq!(facts.bathrooms, 2.5);
        assert_eq!(facts.square_footage, 1_320);
    }

    #[test]
    fn test_negative_price_clamps_to_zero() {
        let raw = RawPropertyFacts {
            purchase_price: Some(-5_000.0),
            ..Default::default()
        };
        assert_eq!(raw.normalize().purchase_price, 0.0);
    }

    #[test]
    fn test_embedded_funding_source() {
        let raw = RawPropertyFacts {
            funding_source: Some("DSCR".to_string()),
            ..Default::default()
        };
        assert_eq!(raw.normalize().funding_source, Some(FundingSource::Dscr));

        let unknown = RawPropertyFacts {
            funding_source: Some("seller-carry".to_string()),
            ..Default::default()
        };
        assert_eq!(unknown.normalize().funding_source, Some(FundingSource::Conventional));
    }
}
