//! Analysis request envelope: listing facts plus everything else a caller can supply

use crate::analysis::{AnalysisInputs, FundingSource, MonthlyExpenseOverrides, MortgageOverride, StrMetrics};
use crate::criteria::InvestmentCriteria;
use crate::error::IntakeError;
use crate::lenient;
use crate::property::{PropertyFacts, RawPropertyFacts};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One analysis request as submitted by a form, a file or an HTTP caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default, alias = "property_id", deserialize_with = "lenient::text")]
    pub property_id: Option<String>,

    #[serde(default)]
    pub property: RawPropertyFacts,

    #[serde(default, alias = "str_metrics")]
    pub str_metrics: Option<StrMetrics>,

    #[serde(default, alias = "monthly_expenses", alias = "expenseOverrides")]
    pub monthly_expenses: Option<MonthlyExpenseOverrides>,

    /// Kept as text so validation can report an unknown value
    #[serde(default, alias = "funding_source", deserialize_with = "lenient::text")]
    pub funding_source: Option<String>,

    /// Annual rate as a decimal
    #[serde(default, alias = "mortgage_rate", deserialize_with = "lenient::number")]
    pub mortgage_rate: Option<f64>,

    #[serde(default, alias = "mortgage_override")]
    pub mortgage_override: Option<MortgageOverride>,

    /// Criteria for this request only
    #[serde(default)]
    pub criteria: Option<InvestmentCriteria>,
}

impl AnalysisRequest {
    /// Wrap bare listing facts in a request
    pub fn for_property(property: RawPropertyFacts) -> Self {
        Self {
            property,
            ..Self::default()
        }
    }

    /// Canonical facts for the engine
    pub fn facts(&self) -> PropertyFacts {
        self.property.normalize()
    }

    /// Engine inputs; an unknown funding source is read as conventional
    pub fn inputs(&self) -> AnalysisInputs {
        AnalysisInputs {
            property_id: self.property_id.clone(),
            str_metrics: self.str_metrics.clone(),
            expense_overrides: self.monthly_expenses.clone(),
            funding_source: self.funding_source.as_deref().map(FundingSource::from_lenient),
            mortgage_rate: self.mortgage_rate,
            mortgage_override: self.mortgage_override.clone(),
        }
    }

    /// Fold a supplemental data file into this request
    ///
    /// Only values that are present and non-zero are taken, so a data file
    /// never blanks out figures the request already has.
    pub fn merge_supplemental(&mut self, data: &SupplementalData) {
        if let Some(extra) = &data.str_metrics {
            let metrics = self.str_metrics.get_or_insert_with(StrMetrics::default);
            take_non_empty(&mut metrics.adr, extra.adr);
            take_non_empty(&mut metrics.occupancy_rate, extra.occupancy_rate);
            take_non_empty(&mut metrics.monthly_rent, extra.monthly_rent);
        }

        if let Some(extra) = &data.monthly_expenses {
            let expenses = self.monthly_expenses.get_or_insert_with(MonthlyExpenseOverrides::default);
            take_non_empty(&mut expenses.property_taxes, extra.property_taxes);
            take_non_empty(&mut expenses.insurance, extra.insurance);
            take_non_empty(&mut expenses.utilities, extra.utilities);
            take_non_empty(&mut expenses.management, extra.management);
            take_non_empty(&mut expenses.maintenance, extra.maintenance);
            take_non_empty(&mut expenses.cleaning, extra.cleaning);
            take_non_empty(&mut expenses.supplies, extra.supplies);
            take_non_empty(&mut expenses.other, extra.other);
        }
    }
}

fn take_non_empty(slot: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = value.filter(|v| *v != 0.0) {
        *slot = Some(v);
    }
}

/// Extra market and expense figures kept alongside a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalData {
    #[serde(default, alias = "str_metrics")]
    pub str_metrics: Option<StrMetrics>,

    #[serde(default, alias = "monthly_expenses", alias = "expenseOverrides")]
    pub monthly_expenses: Option<MonthlyExpenseOverrides>,
}

/// Load a request from a JSON file
///
/// A file holding bare listing facts (no `property` key) is accepted and
/// wrapped as a request with no other inputs.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<AnalysisRequest, IntakeError> {
    let path = path.as_ref();
    let request = load_request_from_reader(File::open(path)?)?;
    info!("loaded analysis request from {}", path.display());
    Ok(request)
}

pub fn load_request_from_reader<R: Read>(reader: R) -> Result<AnalysisRequest, IntakeError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    Ok(request_from_value(value)?)
}

/// Parse a request body, accepting bare listing facts like [`load_request`]
pub fn parse_request(json: &str) -> Result<AnalysisRequest, serde_json::Error> {
    request_from_value(serde_json::from_str(json)?)
}

fn request_from_value(value: serde_json::Value) -> Result<AnalysisRequest, serde_json::Error> {
    if value.get("property").is_some() {
        serde_json::from_value(value)
    } else {
        debug!("request has no property key; reading it as bare listing facts");
        Ok(AnalysisRequest::for_property(serde_json::from_value(value)?))
    }
}

/// Load supplemental STR and expense figures from a JSON file
pub fn load_supplemental<P: AsRef<Path>>(path: P) -> Result<SupplementalData, IntakeError> {
    let path = path.as_ref();
    let data: SupplementalData = serde_json::from_reader(File::open(path)?)?;
    info!("loaded supplemental data from {}", path.display());
    Ok(data)
}
