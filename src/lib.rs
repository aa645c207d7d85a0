//! Deal Analyzer - Property investment analysis engine
//!
//! This library provides:
//! - Listing intake from JSON (either field casing) and CSV exports
//! - A deterministic analysis engine: upfront cash, financing, monthly
//!   expenses, cash flow, cash-on-cash return, cap rate, STR projections
//! - Investment criteria loading and the pass/fail verdict
//! - Request validation and parallel batch analysis

pub mod analysis;
pub mod criteria;
pub mod error;
pub mod lenient;
pub mod property;
pub mod request;
pub mod runner;
pub mod validation;

// Re-export commonly used types
pub use analysis::{analyze, AnalysisEngine, AnalysisInputs, DealAnalysis, DealSummary, FundingSource};
pub use criteria::InvestmentCriteria;
pub use error::{IntakeError, ValidationError};
pub use property::{PropertyFacts, RawPropertyFacts};
pub use request::{AnalysisRequest, SupplementalData};
pub use runner::AnalysisRunner;
pub use validation::validate_request;
