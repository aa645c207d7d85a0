//! Financing and operating inputs to a deal analysis

use crate::error::UnknownFundingSource;
use crate::lenient;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Financing method, which fixes the assumed down payment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingSource {
    #[default]
    Conventional,
    Fha,
    Va,
    /// Debt-service-coverage-ratio investor loan
    Dscr,
    /// All-cash purchase, no loan
    Cash,
}

impl FundingSource {
    pub const ALL: [FundingSource; 5] = [
        FundingSource::Conventional,
        FundingSource::Fha,
        FundingSource::Va,
        FundingSource::Dscr,
        FundingSource::Cash,
    ];

    /// Down payment as a fraction of purchase price
    pub fn down_payment_fraction(&self) -> f64 {
        match self {
            FundingSource::Conventional => 0.05,
            FundingSource::Fha => 0.035,
            FundingSource::Va => 0.0,
            FundingSource::Dscr => 0.20,
            FundingSource::Cash => 1.0,
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, FundingSource::Cash)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundingSource::Conventional => "conventional",
            FundingSource::Fha => "fha",
            FundingSource::Va => "va",
            FundingSource::Dscr => "dscr",
            FundingSource::Cash => "cash",
        }
    }

    /// Parse, treating anything unrecognized as conventional
    pub fn from_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|e| {
            warn!("{}; treating as conventional", e);
            FundingSource::Conventional
        })
    }
}

impl FromStr for FundingSource {
    type Err = UnknownFundingSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        FundingSource::ALL
            .into_iter()
            .find(|source| source.as_str() == normalized)
            .ok_or_else(|| UnknownFundingSource(s.trim().to_string()))
    }
}

impl fmt::Display for FundingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treat occupancy above 1 as a percentage and bound the result to [0, 1]
pub fn normalize_occupancy(rate: f64) -> f64 {
    let fraction = if rate > 1.0 { rate / 100.0 } else { rate };
    fraction.clamp(0.0, 1.0)
}

/// Market figures for short-term-rental use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrMetrics {
    #[serde(default, deserialize_with = "lenient::number")]
    pub adr: Option<f64>,

    #[serde(default, alias = "occupancy_rate", deserialize_with = "lenient::number")]
    pub occupancy_rate: Option<f64>,

    /// Monthly rent already computed by an STR market tool
    #[serde(default, alias = "monthly_rent", deserialize_with = "lenient::number")]
    pub monthly_rent: Option<f64>,
}

/// Caller-supplied monthly expenses; unset fields are estimated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenseOverrides {
    #[serde(default, alias = "property_taxes", alias = "propertyTax", deserialize_with = "lenient::number")]
    pub property_taxes: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub insurance: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub utilities: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub management: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub maintenance: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub cleaning: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub supplies: Option<f64>,

    #[serde(default, alias = "other_expenses", alias = "otherExpenses", deserialize_with = "lenient::number")]
    pub other: Option<f64>,
}

/// Loan terms from an external mortgage calculator
///
/// A positive `loan_amount` replaces the funding-source down payment; a
/// positive `monthly_payment` replaces the amortization result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageOverride {
    #[serde(default, alias = "loan_amount", deserialize_with = "lenient::number")]
    pub loan_amount: Option<f64>,

    /// Nominal annual rate as a percentage (6.5 = 6.5%)
    #[serde(default, alias = "interest_rate", deserialize_with = "lenient::number")]
    pub interest_rate: Option<f64>,

    #[serde(default, alias = "loan_term_years", alias = "termYears", deserialize_with = "lenient::number")]
    pub loan_term_years: Option<f64>,

    #[serde(default, alias = "monthly_payment", deserialize_with = "lenient::number")]
    pub monthly_payment: Option<f64>,
}

impl MortgageOverride {
    pub(crate) fn positive_loan_amount(&self) -> Option<f64> {
        self.loan_amount.filter(|amount| amount.is_finite() && *amount > 0.0)
    }

    pub(crate) fn positive_monthly_payment(&self) -> Option<f64> {
        self.monthly_payment.filter(|payment| payment.is_finite() && *payment > 0.0)
    }
}

/// Everything besides the listing facts that shapes one analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisInputs {
    /// Identifier to stamp on the result; a temporary id is generated if absent
    pub property_id: Option<String>,
    pub str_metrics: Option<StrMetrics>,
    pub expense_overrides: Option<MonthlyExpenseOverrides>,
    /// Explicit financing; wins over any funding source embedded in the facts
    pub funding_source: Option<FundingSource>,
    /// Annual mortgage rate as a decimal (0.07 = 7%)
    pub mortgage_rate: Option<f64>,
    pub mortgage_override: Option<MortgageOverride>,
}

impl AnalysisInputs {
    pub fn with_funding(funding_source: FundingSource) -> Self {
        Self {
            funding_source: Some(funding_source),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_payment_fractions() {
        assert_eq!(FundingSource::Conventional.down_payment_fraction(), 0.05);
        assert_eq!(FundingSource::Fha.down_payment_fraction(), 0.035);
        assert_eq!(FundingSource::Va.down_payment_fraction(), 0.0);
        assert_eq!(FundingSource::Dscr.down_payment_fraction(), 0.20);
        assert_eq!(FundingSource::Cash.down_payment_fraction(), 1.0);
    }

    #[test]
    fn test_funding_source_parsing() {
        assert_eq!("FHA".parse::<FundingSource>(), Ok(FundingSource::Fha));
        assert_eq!(" va ".parse::<FundingSource>(), Ok(FundingSource::Va));
        assert_eq!(
            "heloc".parse::<FundingSource>(),
            Err(UnknownFundingSource("heloc".to_string()))
        );
        assert_eq!(FundingSource::from_lenient("heloc"), FundingSource::Conventional);
        assert_eq!(FundingSource::default(), FundingSource::Conventional);
    }

    #[test]
    fn test_funding_source_serde_is_lowercase() {
        let json = serde_json::to_string(&FundingSource::Dscr).unwrap();
        assert_eq!(json, "\"dscr\"");
    }

    #[test]
    fn test_normalize_occupancy() {
        assert_eq!(normalize_occupancy(65.0), 0.65);
        assert_eq!(normalize_occupancy(0.65), 0.65);
        assert_eq!(normalize_occupancy(1.0), 1.0);
        assert_eq!(normalize_occupancy(150.0), 1.0);
        assert_eq!(normalize_occupancy(-0.2), 0.0);
    }

    #[test]
    fn test_overrides_accept_both_spellings() {
        let a: MonthlyExpenseOverrides =
            serde_json::from_str(r#"{"property_taxes": 210, "other_expenses": 15}"#).unwrap();
        let b: MonthlyExpenseOverrides =
            serde_json::from_str(r#"{"propertyTaxes": 210, "other": 15}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.insurance, None);
    }
}
