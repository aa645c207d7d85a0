//! Core analysis engine: listing facts plus financing in, deal verdict out

use super::inputs::{normalize_occupancy, AnalysisInputs, FundingSource, MonthlyExpenseOverrides};
use super::mortgage::{self, DEFAULT_ANNUAL_RATE, STANDARD_TERM_MONTHS};
use super::result::{DealAnalysis, MonthlyExpenses};
use crate::criteria::InvestmentCriteria;
use crate::property::PropertyFacts;
use log::debug;

/// Annual property tax as a fraction of price
const PROPERTY_TAX_RATE: f64 = 0.012;
/// Flat monthly insurance estimate
const INSURANCE_MONTHLY: f64 = 100.0;
/// Vacancy allowance as a fraction of rent
const VACANCY_RATE: f64 = 0.05;
/// Property management as a fraction of rent
const MANAGEMENT_RATE: f64 = 0.10;
/// Monthly rent must be at least this fraction of price
const ONE_PERCENT_RULE: f64 = 0.01;
/// Nights per month for STR projections
const STR_NIGHTS_PER_MONTH: f64 = 30.0;

/// Drop NaN and infinite values so they read as missing
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Build the fallback id stamped on analyses that arrive without one
pub fn temp_property_id() -> String {
    format!("temp-{}", chrono::Utc::now().timestamp_millis())
}

/// Step-1 view of the inputs: every value the later steps read
#[derive(Debug, Clone)]
struct ResolvedInputs {
    facts: PropertyFacts,
    funding_source: FundingSource,
    purchase_price: f64,
    monthly_rent: f64,
    adr: Option<f64>,
    occupancy_rate: Option<f64>,
}

impl ResolvedInputs {
    /// STR figures when both ADR and occupancy are positive
    fn str_figures(&self) -> Option<(f64, f64)> {
        match (self.adr, self.occupancy_rate) {
            (Some(adr), Some(occupancy)) if adr > 0.0 && occupancy > 0.0 => Some((adr, occupancy)),
            _ => None,
        }
    }
}

/// Deal analysis engine
///
/// Holds the criteria deals are judged against. Analysis itself performs no
/// I/O and shares no state, so one engine can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    criteria: InvestmentCriteria,
}

impl AnalysisEngine {
    /// Create an engine judging deals against the given criteria
    pub fn new(criteria: InvestmentCriteria) -> Self {
        Self { criteria }
    }

    /// Run the full analysis for one listing
    pub fn analyze(&self, facts: &PropertyFacts, inputs: &AnalysisInputs) -> DealAnalysis {
        let resolved = self.resolve_inputs(facts, inputs);
        let property_id = inputs.property_id.clone().unwrap_or_else(temp_property_id);

        let mut analysis = DealAnalysis::new(property_id, resolved.facts.clone(), resolved.funding_source);

        self.calculate_upfront_cash(&resolved, inputs, &mut analysis);

        analysis.passes_1_percent_rule =
            resolved.monthly_rent >= resolved.purchase_price * ONE_PERCENT_RULE;

        self.calculate_mortgage(&resolved, inputs, &mut analysis);
        self.calculate_expenses(&resolved, inputs.expense_overrides.as_ref(), &mut analysis);

        analysis.cash_flow = resolved.monthly_rent - analysis.total_monthly_expenses;
        analysis.cash_flow_positive = analysis.cash_flow >= 0.0;

        self.calculate_returns(&resolved, &mut analysis);
        self.apply_str_overlay(&resolved, &mut analysis);
        self.apply_verdict(&resolved, &mut analysis);

        debug!(
            "analyzed {}: price={:.0} rent={:.2} funding={} cash_flow={:.2} coc={:.4} cap={:.4} meets={}",
            analysis.property_id,
            resolved.purchase_price,
            resolved.monthly_rent,
            resolved.funding_source,
            analysis.cash_flow,
            analysis.coc_return,
            analysis.cap_rate,
            analysis.meets_criteria,
        );

        analysis
    }

    /// Resolve funding source, occupancy and rent precedence
    fn resolve_inputs(&self, facts: &PropertyFacts, inputs: &AnalysisInputs) -> ResolvedInputs {
        let funding_source = inputs
            .funding_source
            .or(facts.funding_source)
            .unwrap_or_default();

        let purchase_price = if facts.purchase_price.is_finite() {
            facts.purchase_price.max(0.0)
        } else {
            0.0
        };

        let str_metrics = inputs.str_metrics.clone().unwrap_or_default();

        // STR metrics only win when they carry a usable value
        let adr = finite(str_metrics.adr)
            .filter(|v| *v > 0.0)
            .or(finite(facts.adr));
        let occupancy_rate = finite(str_metrics.occupancy_rate)
            .filter(|v| *v > 0.0)
            .or(finite(facts.occupancy_rate))
            .map(normalize_occupancy);

        let mut monthly_rent = finite(str_metrics.monthly_rent).unwrap_or(facts.monthly_rent);
        if !monthly_rent.is_finite() {
            monthly_rent = 0.0;
        }
        if monthly_rent == 0.0 {
            if let (Some(adr), Some(occupancy)) = (adr, occupancy_rate) {
                monthly_rent = adr * STR_NIGHTS_PER_MONTH * occupancy;
            }
        }

        let mut echoed = facts.clone();
        echoed.purchase_price = purchase_price;
        echoed.monthly_rent = monthly_rent;
        echoed.adr = adr;
        echoed.occupancy_rate = occupancy_rate;
        echoed.funding_source = Some(funding_source);

        ResolvedInputs {
            facts: echoed,
            funding_source,
            purchase_price,
            monthly_rent,
            adr,
            occupancy_rate,
        }
    }

    /// Down payment, closing costs, fixed costs and maintenance reserve
    fn calculate_upfront_cash(&self, resolved: &ResolvedInputs, inputs: &AnalysisInputs, analysis: &mut DealAnalysis) {
        let price = resolved.purchase_price;

        let override_loan = inputs
            .mortgage_override
            .as_ref()
            .and_then(|o| o.positive_loan_amount());

        analysis.calculated_downpayment = match override_loan {
            Some(loan_amount) => price - loan_amount,
            None => price * resolved.funding_source.down_payment_fraction(),
        };
        analysis.calculated_closing_costs = price * self.criteria.closing_cost_pct();
        analysis.calculated_initial_fixed_costs = price * self.criteria.initial_fixed_cost_pct;
        analysis.estimated_maintenance_reserve = resolved.monthly_rent * self.criteria.maintenance_reserve_pct;

        // The maintenance reserve is an ongoing cost, not acquisition cash
        analysis.total_cash_needed = analysis.calculated_downpayment
            + analysis.calculated_closing_costs
            + analysis.calculated_initial_fixed_costs;

        analysis.loan_amount = price - analysis.calculated_downpayment;
    }

    /// Monthly principal and interest
    fn calculate_mortgage(&self, resolved: &ResolvedInputs, inputs: &AnalysisInputs, analysis: &mut DealAnalysis) {
        let override_payment = inputs
            .mortgage_override
            .as_ref()
            .and_then(|o| o.positive_monthly_payment());

        analysis.monthly_mortgage_payment = if resolved.funding_source.is_cash() {
            0.0
        } else if let Some(payment) = override_payment {
            payment
        } else {
            let annual_rate = finite(inputs.mortgage_rate).unwrap_or(DEFAULT_ANNUAL_RATE);
            mortgage::monthly_payment(analysis.loan_amount, annual_rate, STANDARD_TERM_MONTHS)
        };
    }

    /// Monthly carrying costs, using overrides where supplied
    fn calculate_expenses(
        &self,
        resolved: &ResolvedInputs,
        overrides: Option<&MonthlyExpenseOverrides>,
        analysis: &mut DealAnalysis,
    ) {
        let defaults = MonthlyExpenseOverrides::default();
        let overrides = overrides.unwrap_or(&defaults);
        let rent = resolved.monthly_rent;

        let pick = |value: Option<f64>, estimate: f64| finite(value).unwrap_or(estimate);

        let expenses = MonthlyExpenses {
            mortgage: analysis.monthly_mortgage_payment,
            property_tax: pick(overrides.property_taxes, resolved.purchase_price * PROPERTY_TAX_RATE / 12.0),
            insurance: pick(overrides.insurance, INSURANCE_MONTHLY),
            vacancy: rent * VACANCY_RATE,
            maintenance: pick(overrides.maintenance, analysis.estimated_maintenance_reserve),
            management: pick(overrides.management, rent * MANAGEMENT_RATE),
            utilities: pick(overrides.utilities, 0.0),
            cleaning: pick(overrides.cleaning, 0.0),
            supplies: pick(overrides.supplies, 0.0),
            other: pick(overrides.other, 0.0),
        };

        analysis.total_monthly_expenses = expenses.total();
        analysis.monthly_expenses = expenses;
    }

    /// Cash-on-cash return and cap rate with their threshold flags
    fn calculate_returns(&self, resolved: &ResolvedInputs, analysis: &mut DealAnalysis) {
        analysis.coc_return = if analysis.total_cash_needed > 0.0 {
            analysis.cash_flow * 12.0 / analysis.total_cash_needed
        } else {
            0.0
        };
        analysis.coc_meets_benchmark = analysis.coc_return >= self.criteria.coc_benchmark_min;
        analysis.coc_meets_minimum = analysis.coc_return >= self.criteria.coc_minimum_min;

        // Gross rent over price: no operating expenses, no financing
        analysis.cap_rate = if resolved.purchase_price > 0.0 {
            resolved.monthly_rent * 12.0 / resolved.purchase_price
        } else {
            0.0
        };
        analysis.cap_meets_benchmark = analysis.cap_rate >= self.criteria.cap_benchmark_min;
        analysis.cap_meets_minimum = analysis.cap_rate >= self.criteria.cap_minimum_min;
    }

    /// Short-term-rental projections, only when ADR and occupancy are positive
    fn apply_str_overlay(&self, resolved: &ResolvedInputs, analysis: &mut DealAnalysis) {
        let Some((adr, occupancy)) = resolved.str_figures() else {
            return;
        };

        let annual_revenue = adr * STR_NIGHTS_PER_MONTH * 12.0 * occupancy;
        let gross_yield = if resolved.purchase_price > 0.0 {
            annual_revenue / resolved.purchase_price
        } else {
            0.0
        };

        let criteria = &self.criteria;
        let below = |value: f64, minimum: Option<f64>| minimum.is_some_and(|min| value < min);
        let str_meets = !(below(adr, criteria.str_adr_minimum)
            || below(occupancy, criteria.str_occupancy_minimum)
            || below(gross_yield, criteria.str_gross_yield_minimum)
            || below(annual_revenue, criteria.str_annual_revenue_minimum));

        analysis.projected_annual_revenue = Some(annual_revenue);
        analysis.projected_gross_yield = Some(gross_yield);
        analysis.str_net_income = Some(annual_revenue / 12.0 - analysis.total_monthly_expenses);
        analysis.str_meets_criteria = Some(str_meets);
    }

    /// Every base condition is mandatory; STR criteria join when present
    fn apply_verdict(&self, resolved: &ResolvedInputs, analysis: &mut DealAnalysis) {
        let base = resolved.purchase_price <= self.criteria.max_purchase_price
            && analysis.passes_1_percent_rule
            && analysis.cash_flow_positive
            && analysis.coc_meets_minimum
            && analysis.cap_meets_minimum;

        analysis.meets_criteria = base && analysis.str_meets_criteria.unwrap_or(true);
    }
}

/// Analyze one listing against the given criteria
pub fn analyze(facts: &PropertyFacts, inputs: &AnalysisInputs, criteria: &InvestmentCriteria) -> DealAnalysis {
    AnalysisEngine::new(criteria.clone()).analyze(facts, inputs)
}
