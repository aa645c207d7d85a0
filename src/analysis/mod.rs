//! Deal analysis: financing inputs, amortization, the engine and its output

mod engine;
mod inputs;
pub mod mortgage;
mod result;

pub use engine::{analyze, temp_property_id, AnalysisEngine};
pub use inputs::{
    normalize_occupancy, AnalysisInputs, FundingSource, MonthlyExpenseOverrides, MortgageOverride, StrMetrics,
};
pub use result::{DealAnalysis, DealSummary, MonthlyExpenses};
