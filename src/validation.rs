//! Request shape checks run before a request reaches the engine
//!
//! The engine itself accepts anything and coalesces; these checks exist so a
//! caller gets told about a negative rent instead of a meaningless verdict.

use crate::analysis::FundingSource;
use crate::error::{FieldViolation, ValidationError};
use crate::request::AnalysisRequest;

/// Collect every violation in the request
pub fn validate_request(request: &AnalysisRequest) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    let property = &request.property;

    match property.purchase_price {
        None => violations.push(FieldViolation::new("property.purchasePrice", "is required")),
        Some(price) if price <= 0.0 => {
            violations.push(FieldViolation::new("property.purchasePrice", "must be greater than 0"))
        }
        Some(_) => {}
    }

    non_negative(&mut violations, "property.monthlyRent", property.monthly_rent);
    non_negative(&mut violations, "property.adr", property.adr);
    occupancy(&mut violations, "property.occupancyRate", property.occupancy_rate);
    funding_source(&mut violations, "property.fundingSource", property.funding_source.as_deref());

    if let Some(metrics) = &request.str_metrics {
        non_negative(&mut violations, "strMetrics.adr", metrics.adr);
        occupancy(&mut violations, "strMetrics.occupancyRate", metrics.occupancy_rate);
        non_negative(&mut violations, "strMetrics.monthlyRent", metrics.monthly_rent);
    }

    funding_source(&mut violations, "fundingSource", request.funding_source.as_deref());
    non_negative(&mut violations, "mortgageRate", request.mortgage_rate);

    if let Some(mortgage) = &request.mortgage_override {
        non_negative(&mut violations, "mortgageOverride.loanAmount", mortgage.loan_amount);
        non_negative(&mut violations, "mortgageOverride.interestRate", mortgage.interest_rate);
        non_negative(&mut violations, "mortgageOverride.loanTermYears", mortgage.loan_term_years);
        non_negative(&mut violations, "mortgageOverride.monthlyPayment", mortgage.monthly_payment);
    }

    if let Some(expenses) = &request.monthly_expenses {
        let lines = [
            ("monthlyExpenses.propertyTaxes", expenses.property_taxes),
            ("monthlyExpenses.insurance", expenses.insurance),
            ("monthlyExpenses.utilities", expenses.utilities),
            ("monthlyExpenses.management", expenses.management),
            ("monthlyExpenses.maintenance", expenses.maintenance),
            ("monthlyExpenses.cleaning", expenses.cleaning),
            ("monthlyExpenses.supplies", expenses.supplies),
            ("monthlyExpenses.other", expenses.other),
        ];
        for (field, value) in lines {
            non_negative(&mut violations, field, value);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn non_negative(violations: &mut Vec<FieldViolation>, field: &str, value: Option<f64>) {
    if value.is_some_and(|v| v < 0.0) {
        violations.push(FieldViolation::new(field, "must not be negative"));
    }
}

fn occupancy(violations: &mut Vec<FieldViolation>, field: &str, value: Option<f64>) {
    match value {
        Some(v) if v < 0.0 => violations.push(FieldViolation::new(field, "must not be negative")),
        Some(v) if v > 100.0 => violations.push(FieldViolation::new(field, "must not exceed 100")),
        _ => {}
    }
}

fn funding_source(violations: &mut Vec<FieldViolation>, field: &str, value: Option<&str>) {
    if let Some(Err(e)) = value.map(str::parse::<FundingSource>) {
        violations.push(FieldViolation::new(field, e.to_string()));
    }
}
