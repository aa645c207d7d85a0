//! End-to-end checks of the analysis rules through the public API

use approx::assert_relative_eq;
use deal_analyzer::analysis::mortgage::{monthly_payment, STANDARD_TERM_MONTHS};
use deal_analyzer::analysis::{MortgageOverride, StrMetrics};
use deal_analyzer::property::load_listings;
use deal_analyzer::{
    analyze, validate_request, AnalysisEngine, AnalysisInputs, AnalysisRequest, AnalysisRunner, FundingSource,
    InvestmentCriteria, PropertyFacts,
};

fn facts(price: f64, rent: f64) -> PropertyFacts {
    PropertyFacts::new(price, rent)
}

#[test]
fn down_payment_follows_funding_source() {
    let engine = AnalysisEngine::default();
    let expected = [
        (FundingSource::Conventional, 10_000.0),
        (FundingSource::Fha, 7_000.0),
        (FundingSource::Va, 0.0),
        (FundingSource::Dscr, 40_000.0),
        (FundingSource::Cash, 200_000.0),
    ];

    for (source, down_payment) in expected {
        let result = engine.analyze(&facts(200_000.0, 2_000.0), &AnalysisInputs::with_funding(source));
        assert_relative_eq!(result.calculated_downpayment, down_payment, epsilon = 1e-6);

        if source == FundingSource::Cash {
            assert_eq!(result.monthly_mortgage_payment, 0.0);
        } else {
            assert!(result.monthly_mortgage_payment > 0.0, "{} should carry a loan", source);
        }
    }
}

#[test]
fn one_percent_rule_boundary() {
    let engine = AnalysisEngine::default();
    let inputs = AnalysisInputs::default();

    assert!(engine.analyze(&facts(300_000.0, 3_000.0), &inputs).passes_1_percent_rule);
    assert!(!engine.analyze(&facts(300_000.0, 2_999.0), &inputs).passes_1_percent_rule);
}

#[test]
fn coc_is_zero_when_no_cash_is_needed() {
    // VA financing with no closing or fixed costs needs no cash at all
    let criteria = InvestmentCriteria {
        closing_cost_pct_min: 0.0,
        closing_cost_pct_max: 0.0,
        initial_fixed_cost_pct: 0.0,
        ..InvestmentCriteria::default()
    };
    let result = analyze(
        &facts(150_000.0, 1_800.0),
        &AnalysisInputs::with_funding(FundingSource::Va),
        &criteria,
    );

    assert_eq!(result.total_cash_needed, 0.0);
    assert_eq!(result.coc_return, 0.0);
    assert!(!result.coc_meets_minimum);
}

#[test]
fn str_rent_is_derived_from_adr_and_occupancy() {
    let result = AnalysisEngine::default().analyze(&facts(200_000.0, 0.0).with_str(150.0, 0.70), &AnalysisInputs::default());

    assert_relative_eq!(result.property.monthly_rent, 3_150.0, epsilon = 1e-9);
    assert_relative_eq!(result.projected_annual_revenue.unwrap(), 37_800.0, epsilon = 1e-6);
}

#[test]
fn percentage_occupancy_matches_fraction() {
    let engine = AnalysisEngine::default();

    let as_percent = engine.analyze(&facts(200_000.0, 0.0).with_str(150.0, 65.0), &AnalysisInputs::default());
    let as_fraction = engine.analyze(&facts(200_000.0, 0.0).with_str(150.0, 0.65), &AnalysisInputs::default());

    assert_eq!(as_percent.property.occupancy_rate, Some(0.65));
    assert_eq!(as_percent.projected_annual_revenue, as_fraction.projected_annual_revenue);
    assert_eq!(as_percent.property.monthly_rent, as_fraction.property.monthly_rent);

    // Same rule applies to occupancy from STR metrics
    let via_metrics = engine.analyze(
        &facts(200_000.0, 0.0),
        &AnalysisInputs {
            str_metrics: Some(StrMetrics {
                adr: Some(150.0),
                occupancy_rate: Some(65.0),
                monthly_rent: None,
            }),
            ..Default::default()
        },
    );
    assert_eq!(via_metrics.projected_annual_revenue, as_fraction.projected_annual_revenue);
}

#[test]
fn cap_rate_ignores_financing() {
    let engine = AnalysisEngine::default();
    let listing = facts(180_000.0, 1_950.0);

    for source in FundingSource::ALL {
        for rate in [0.0, 0.045, 0.07, 0.11] {
            let inputs = AnalysisInputs {
                funding_source: Some(source),
                mortgage_rate: Some(rate),
                ..Default::default()
            };
            let result = engine.analyze(&listing, &inputs);
            assert_relative_eq!(result.cap_rate, 1_950.0 * 12.0 / 180_000.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn cap_rate_is_gross_rent_over_price() {
    let engine = AnalysisEngine::default();
    let listing = facts(200_000.0, 2_000.0);

    let cheap = engine.analyze(&listing, &AnalysisInputs::default());
    let costly = engine.analyze(
        &listing,
        &AnalysisInputs {
            expense_overrides: Some(deal_analyzer::analysis::MonthlyExpenseOverrides {
                insurance: Some(600.0),
                utilities: Some(400.0),
                ..Default::default()
            }),
            ..Default::default()
        },
    );

    assert_relative_eq!(cheap.cap_rate, 0.12, epsilon = 1e-12);
    assert_eq!(cheap.cap_rate, costly.cap_rate);
    assert!(costly.cash_flow < cheap.cash_flow);
}

#[test]
fn override_payment_is_used_verbatim() {
    let inputs = AnalysisInputs {
        mortgage_rate: Some(0.09),
        mortgage_override: Some(MortgageOverride {
            monthly_payment: Some(1_500.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    let result = AnalysisEngine::default().analyze(&facts(250_000.0, 2_600.0), &inputs);

    assert_eq!(result.monthly_mortgage_payment, 1_500.0);
    assert_eq!(result.monthly_expenses.mortgage, 1_500.0);
}

#[test]
fn failing_cap_minimum_fails_the_deal() {
    let listing = facts(120_000.0, 2_000.0);
    let inputs = AnalysisInputs::with_funding(FundingSource::Dscr);

    let passing = AnalysisEngine::default().analyze(&listing, &inputs);
    assert!(passing.meets_criteria);

    let strict = InvestmentCriteria {
        cap_minimum_min: 0.21,
        ..InvestmentCriteria::default()
    };
    let result = AnalysisEngine::new(strict).analyze(&listing, &inputs);

    assert!(result.passes_1_percent_rule);
    assert!(result.cash_flow_positive);
    assert!(result.coc_meets_minimum);
    assert!(!result.cap_meets_minimum);
    assert!(!result.meets_criteria);
}

#[test]
fn conventional_deal_end_to_end() {
    let request: AnalysisRequest = serde_json::from_str(
        r#"{"propertyId": "oak-12",
            "property": {"address": "12 Oak St", "purchase_price": 250000, "monthlyRent": 2600},
            "fundingSource": "conventional",
            "mortgageRate": 0.07}"#,
    )
    .unwrap();
    assert!(validate_request(&request).is_ok());

    let result = AnalysisRunner::new().run(&request);

    assert_eq!(result.property_id, "oak-12");
    assert_relative_eq!(result.calculated_downpayment, 12_500.0);
    assert!(result.passes_1_percent_rule);
    assert_relative_eq!(
        result.monthly_mortgage_payment,
        monthly_payment(237_500.0, 0.07, STANDARD_TERM_MONTHS)
    );
    assert_relative_eq!(result.monthly_mortgage_payment, 1_580.09, epsilon = 0.01);
    assert_relative_eq!(result.cash_flow, 2_600.0 - result.total_monthly_expenses);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["propertyId"], "oak-12");
    assert_eq!(json["fundingSource"], "conventional");
    assert_eq!(json["passes1PercentRule"], true);
    assert!(json["strMeetsCriteria"].is_null());
}

#[test]
fn sample_listings_batch() {
    let listings = load_listings("data/sample_listings.csv").expect("Failed to load sample listings");
    assert_eq!(listings.len(), 4);

    let analyses = AnalysisRunner::new().run_batch(&listings);
    let ids: Vec<_> = analyses.iter().map(|a| a.property_id.as_str()).collect();
    assert_eq!(ids, ["row-1", "row-2", "row-3", "row-4"]);

    let condo = &analyses[1];
    assert_eq!(condo.property.property_type, "condo");
    assert_relative_eq!(condo.property.monthly_rent, 165.0 * 30.0 * 0.72, epsilon = 1e-9);
    assert!(condo.has_str());

    // Over the price ceiling
    assert!(!analyses[3].meets_criteria);
}
