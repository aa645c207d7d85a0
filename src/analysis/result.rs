//! Deal analysis output records

use super::inputs::FundingSource;
use crate::property::PropertyFacts;
use serde::{Deserialize, Serialize};

/// Monthly carrying costs of a deal, line by line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenses {
    pub mortgage: f64,
    pub property_tax: f64,
    pub insurance: f64,
    /// Always estimated; there is no override for vacancy
    pub vacancy: f64,
    pub maintenance: f64,
    pub management: f64,
    pub utilities: f64,
    pub cleaning: f64,
    pub supplies: f64,
    pub other: f64,
}

impl MonthlyExpenses {
    pub fn total(&self) -> f64 {
        self.mortgage
            + self.property_tax
            + self.insurance
            + self.vacancy
            + self.maintenance
            + self.management
            + self.utilities
            + self.cleaning
            + self.supplies
            + self.other
    }

    /// Carrying costs excluding debt service
    pub fn operating(&self) -> f64 {
        self.total() - self.mortgage
    }
}

/// Complete financial verdict for one listing
///
/// A snapshot: re-running the analysis produces a new record rather than
/// updating this one. STR fields are `None` unless both ADR and occupancy
/// were positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealAnalysis {
    pub property_id: String,

    /// Normalized facts, with resolved rent and fractional occupancy
    pub property: PropertyFacts,

    pub funding_source: FundingSource,

    // Upfront cash
    pub calculated_downpayment: f64,
    pub calculated_closing_costs: f64,
    pub calculated_initial_fixed_costs: f64,
    pub estimated_maintenance_reserve: f64,
    pub total_cash_needed: f64,

    #[serde(rename = "passes1PercentRule")]
    pub passes_1_percent_rule: bool,

    // Financing
    pub loan_amount: f64,
    pub monthly_mortgage_payment: f64,

    // Operations
    pub monthly_expenses: MonthlyExpenses,
    pub total_monthly_expenses: f64,
    pub cash_flow: f64,
    pub cash_flow_positive: bool,

    // Returns
    pub coc_return: f64,
    pub coc_meets_benchmark: bool,
    pub coc_meets_minimum: bool,
    pub cap_rate: f64,
    pub cap_meets_benchmark: bool,
    pub cap_meets_minimum: bool,

    // Short-term rental overlay
    pub projected_annual_revenue: Option<f64>,
    pub projected_gross_yield: Option<f64>,
    pub str_net_income: Option<f64>,
    pub str_meets_criteria: Option<bool>,

    pub meets_criteria: bool,
}

impl DealAnalysis {
    /// Create a blank analysis for the given facts
    pub fn new(property_id: String, property: PropertyFacts, funding_source: FundingSource) -> Self {
        Self {
            property_id,
            property,
            funding_source,
            calculated_downpayment: 0.0,
            calculated_closing_costs: 0.0,
            calculated_initial_fixed_costs: 0.0,
            estimated_maintenance_reserve: 0.0,
            total_cash_needed: 0.0,
            passes_1_percent_rule: false,
            loan_amount: 0.0,
            monthly_mortgage_payment: 0.0,
            monthly_expenses: MonthlyExpenses::default(),
            total_monthly_expenses: 0.0,
            cash_flow: 0.0,
            cash_flow_positive: false,
            coc_return: 0.0,
            coc_meets_benchmark: false,
            coc_meets_minimum: false,
            cap_rate: 0.0,
            cap_meets_benchmark: false,
            cap_meets_minimum: false,
            projected_annual_revenue: None,
            projected_gross_yield: None,
            str_net_income: None,
            str_meets_criteria: None,
            meets_criteria: false,
        }
    }

    /// Whether the short-term-rental overlay was computed
    pub fn has_str(&self) -> bool {
        self.str_meets_criteria.is_some()
    }

    /// Get headline figures
    pub fn summary(&self) -> DealSummary {
        DealSummary {
            property_id: self.property_id.clone(),
            address: self.property.address.clone(),
            purchase_price: self.property.purchase_price,
            monthly_rent: self.property.monthly_rent,
            funding_source: self.funding_source,
            total_cash_needed: self.total_cash_needed,
            annual_cash_flow: self.cash_flow * 12.0,
            coc_return: self.coc_return,
            cap_rate: self.cap_rate,
            meets_criteria: self.meets_criteria,
        }
    }
}

/// Headline figures for one analysis, flat enough for a CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSummary {
    pub property_id: String,
    pub address: String,
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub funding_source: FundingSource,
    pub total_cash_needed: f64,
    pub annual_cash_flow: f64,
    pub coc_return: f64,
    pub cap_rate: f64,
    pub meets_criteria: bool,
}
