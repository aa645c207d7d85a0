//! Investment criteria that an analyzed deal is measured against
//!
//! Criteria are supplied per analysis. The built-in defaults are only a
//! fallback for callers that have no stored criteria of their own.

use crate::error::IntakeError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default path to the criteria file
pub const DEFAULT_CRITERIA_PATH: &str = "data/investment_criteria.json";

/// Thresholds and cost assumptions for a deal verdict
///
/// All rates are decimal fractions (0.08 = 8%). Missing fields in a criteria
/// file take the built-in default, so partial files are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentCriteria {
    /// Purchase price ceiling
    pub max_purchase_price: f64,

    /// Cash-on-cash return benchmark
    pub coc_benchmark_min: f64,

    /// Cash-on-cash return bare minimum
    pub coc_minimum_min: f64,

    /// Cap rate benchmark
    pub cap_benchmark_min: f64,

    /// Cap rate bare minimum
    pub cap_minimum_min: f64,

    /// Closing costs as a fraction of price, low end of the estimate
    pub closing_cost_pct_min: f64,

    /// Closing costs as a fraction of price, high end of the estimate
    pub closing_cost_pct_max: f64,

    /// Initial fixed costs (repairs, furnishing) as a fraction of price
    pub initial_fixed_cost_pct: f64,

    /// Monthly maintenance reserve as a fraction of rent
    pub maintenance_reserve_pct: f64,

    /// Short-term-rental minimums; `None` means the criterion is not applied
    pub str_adr_minimum: Option<f64>,
    pub str_occupancy_minimum: Option<f64>,
    pub str_gross_yield_minimum: Option<f64>,
    pub str_annual_revenue_minimum: Option<f64>,
}

impl Default for InvestmentCriteria {
    fn default() -> Self {
        Self {
            max_purchase_price: 300_000.0,
            coc_benchmark_min: 0.15,
            coc_minimum_min: 0.08,
            cap_benchmark_min: 0.12,
            cap_minimum_min: 0.04,
            closing_cost_pct_min: 0.05,
            closing_cost_pct_max: 0.07,
            initial_fixed_cost_pct: 0.01,
            maintenance_reserve_pct: 0.05,
            str_adr_minimum: Some(100.0),
            str_occupancy_minimum: Some(0.65),
            str_gross_yield_minimum: Some(0.12),
            str_annual_revenue_minimum: Some(30_000.0),
        }
    }
}

impl InvestmentCriteria {
    /// Midpoint of the closing cost estimate range
    pub fn closing_cost_pct(&self) -> f64 {
        (self.closing_cost_pct_min + self.closing_cost_pct_max) / 2.0
    }
}

/// Load criteria from a JSON file
pub fn load_criteria<P: AsRef<Path>>(path: P) -> Result<InvestmentCriteria, IntakeError> {
    let path = path.as_ref();
    let criteria = load_criteria_from_reader(File::open(path)?)?;
    info!("loaded investment criteria from {}", path.display());
    Ok(criteria)
}

/// Load criteria from any reader
pub fn load_criteria_from_reader<R: Read>(reader: R) -> Result<InvestmentCriteria, IntakeError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load criteria from the default location, falling back to built-in defaults
pub fn load_default_criteria() -> InvestmentCriteria {
    let path = Path::new(DEFAULT_CRITERIA_PATH);
    if !path.exists() {
        return InvestmentCriteria::default();
    }

    match load_criteria(path) {
        Ok(criteria) => criteria,
        Err(e) => {
            warn!("ignoring unreadable criteria file {}: {}", path.display(), e);
            InvestmentCriteria::default()
        }
    }
}
