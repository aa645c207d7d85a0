//! Analysis runner for single requests and listing batches
//!
//! Holds the criteria and the session-wide financing defaults once, then
//! analyzes any number of requests or listing rows against them.

use crate::analysis::{AnalysisEngine, AnalysisInputs, DealAnalysis, FundingSource};
use crate::criteria::{load_criteria, InvestmentCriteria};
use crate::error::IntakeError;
use crate::property::RawPropertyFacts;
use crate::request::AnalysisRequest;
use log::info;
use rayon::prelude::*;
use std::path::Path;

/// Pre-configured runner for repeated analyses
///
/// # Example
/// ```ignore
/// let runner = AnalysisRunner::from_criteria_file("data/investment_criteria.json")?
///     .with_mortgage_rate(Some(0.065));
///
/// let analyses = runner.run_batch(&load_listings("listings.csv")?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisRunner {
    criteria: InvestmentCriteria,
    /// Used when a request carries no rate of its own
    mortgage_rate: Option<f64>,
    /// Used when neither the request nor the listing names one
    funding_source: Option<FundingSource>,
}

impl AnalysisRunner {
    /// Create runner with built-in default criteria
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: InvestmentCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    /// Create runner by loading criteria from a JSON file
    pub fn from_criteria_file<P: AsRef<Path>>(path: P) -> Result<Self, IntakeError> {
        Ok(Self::with_criteria(load_criteria(path)?))
    }

    pub fn with_mortgage_rate(mut self, mortgage_rate: Option<f64>) -> Self {
        self.mortgage_rate = mortgage_rate;
        self
    }

    pub fn with_funding_source(mut self, funding_source: Option<FundingSource>) -> Self {
        self.funding_source = funding_source;
        self
    }

    /// Analyze one request
    ///
    /// Criteria and mortgage rate on the request win over the runner's.
    /// The runner's funding source only fills in when the request and the
    /// listing are both silent.
    pub fn run(&self, request: &AnalysisRequest) -> DealAnalysis {
        let facts = request.facts();
        let mut inputs = request.inputs();

        inputs.mortgage_rate = inputs.mortgage_rate.or(self.mortgage_rate);
        if facts.funding_source.is_none() {
            inputs.funding_source = inputs.funding_source.or(self.funding_source);
        }

        let criteria = request.criteria.clone().unwrap_or_else(|| self.criteria.clone());
        AnalysisEngine::new(criteria).analyze(&facts, &inputs)
    }

    /// Analyze listing rows in parallel, preserving input order
    ///
    /// Each row is stamped `row-<n>`, counting from 1.
    pub fn run_batch(&self, listings: &[RawPropertyFacts]) -> Vec<DealAnalysis> {
        let engine = AnalysisEngine::new(self.criteria.clone());

        let analyses: Vec<DealAnalysis> = listings
            .par_iter()
            .enumerate()
            .map(|(i, raw)| {
                let facts = raw.normalize();
                let funding_source = if facts.funding_source.is_none() {
                    self.funding_source
                } else {
                    None
                };
                let inputs = AnalysisInputs {
                    property_id: Some(format!("row-{}", i + 1)),
                    funding_source,
                    mortgage_rate: self.mortgage_rate,
                    ..AnalysisInputs::default()
                };
                engine.analyze(&facts, &inputs)
            })
            .collect();

        info!(
            "analyzed {} listings, {} meet criteria",
            analyses.len(),
            analyses.iter().filter(|a| a.meets_criteria).count()
        );
        analyses
    }

    pub fn criteria(&self) -> &InvestmentCriteria {
        &self.criteria
    }

    pub fn mortgage_rate(&self) -> Option<f64> {
        self.mortgage_rate
    }

    pub fn funding_source(&self) -> Option<FundingSource> {
        self.funding_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn listing(price: f64, rent: f64) -> RawPropertyFacts {
        RawPropertyFacts {
            purchase_price: Some(price),
            monthly_rent: Some(rent),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_criteria_win() {
        let runner = AnalysisRunner::new();
        let mut request = AnalysisRequest::for_property(listing(120_000.0, 2_000.0));
        request.funding_source = Some("dscr".to_string());
        assert!(runner.run(&request).meets_criteria);

        request.criteria = Some(InvestmentCriteria {
            max_purchase_price: 100_000.0,
            ..InvestmentCriteria::default()
        });
        let capped = runner.run(&request);

        assert!(!capped.meets_criteria);
        assert!(capped.passes_1_percent_rule);
    }

    #[test]
    fn test_runner_settings() {
        let runner = AnalysisRunner::with_criteria(InvestmentCriteria {
            max_purchase_price: 410_000.0,
            ..InvestmentCriteria::default()
        })
        .with_mortgage_rate(Some(0.0625))
        .with_funding_source(Some(FundingSource::Dscr));

        assert_eq!(runner.criteria().max_purchase_price, 410_000.0);
        assert_eq!(runner.mortgage_rate(), Some(0.0625));
        assert_eq!(runner.funding_source(), Some(FundingSource::Dscr));
        assert_eq!(AnalysisRunner::new().mortgage_rate(), None);
    }

    #[test]
    fn test_request_rate_wins_over_runner_rate() {
        let runner = AnalysisRunner::new().with_mortgage_rate(Some(0.05));
        let mut request = AnalysisRequest::for_property(listing(200_000.0, 2_000.0));

        let at_runner_rate = runner.run(&request);
        request.mortgage_rate = Some(0.08);
        let at_request_rate = runner.run(&request);

        assert!(at_request_rate.monthly_mortgage_payment > at_runner_rate.monthly_mortgage_payment);
    }

    #[test]
    fn test_runner_funding_source_is_last_resort() {
        let runner = AnalysisRunner::new().with_funding_source(Some(FundingSource::Cash));

        let plain = runner.run(&AnalysisRequest::for_property(listing(100_000.0, 1_200.0)));
        assert_eq!(plain.funding_source, FundingSource::Cash);

        let mut embedded = listing(100_000.0, 1_200.0);
        embedded.funding_source = Some("va".to_string());
        let analysis = runner.run(&AnalysisRequest::for_property(embedded));
        assert_eq!(analysis.funding_source, FundingSource::Va);
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = AnalysisRunner::new();
        let listings: Vec<_> = (1..=50).map(|i| listing(i as f64 * 10_000.0, 1_000.0)).collect();

        let analyses = runner.run_batch(&listings);

        assert_eq!(analyses.len(), 50);
        for (i, analysis) in analyses.iter().enumerate() {
            assert_eq!(analysis.property_id, format!("row-{}", i + 1));
            assert_relative_eq!(analysis.property.purchase_price, (i + 1) as f64 * 10_000.0);
        }
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let runner = AnalysisRunner::new().with_mortgage_rate(Some(0.06));
        let listings = vec![listing(150_000.0, 1_700.0), listing(90_000.0, 1_100.0)];

        let batch = runner.run_batch(&listings);
        for (raw, analysis) in listings.iter().zip(&batch) {
            let mut request = AnalysisRequest::for_property(raw.clone());
            request.property_id = Some(analysis.property_id.clone());
            assert_eq!(&runner.run(&request), analysis);
        }
    }
}
