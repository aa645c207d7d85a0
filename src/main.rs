//! Deal Analyzer CLI
//!
//! Command-line interface for analyzing a single listing from a request
//! file or the first row of a CSV export

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use deal_analyzer::criteria::{load_criteria, load_default_criteria};
use deal_analyzer::property::load_first_listing;
use deal_analyzer::request::{load_request, load_supplemental};
use deal_analyzer::{validate_request, AnalysisRequest, AnalysisRunner, DealAnalysis, FundingSource};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "deal_analyzer", version, about = "Analyze a property listing as an investment")]
struct Cli {
    #[command(flatten)]
    options: SharedOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SharedOptions {
    /// Investment criteria JSON file (built-in defaults if absent)
    #[arg(long, global = true, env = "DEAL_CRITERIA_PATH")]
    criteria: Option<PathBuf>,

    /// Financing used when the listing names none: conventional, fha, va, dscr or cash
    #[arg(long, global = true)]
    funding_source: Option<FundingSource>,

    /// Annual mortgage rate as a decimal (0.07 = 7%)
    #[arg(long, global = true, env = "MORTGAGE_RATE")]
    mortgage_rate: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a JSON analysis request (or bare listing facts)
    Analyze {
        request: PathBuf,

        /// JSON file with extra strMetrics and monthlyExpenses
        #[arg(long)]
        data_file: Option<PathBuf>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze the first listing in a CSV export
    Csv {
        listings: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let criteria = match &cli.options.criteria {
        Some(path) => load_criteria(path)
            .with_context(|| format!("Failed to load criteria from {}", path.display()))?,
        None => load_default_criteria(),
    };
    let runner = AnalysisRunner::with_criteria(criteria)
        .with_mortgage_rate(cli.options.mortgage_rate)
        .with_funding_source(cli.options.funding_source);

    let (request, json) = match cli.command {
        Command::Analyze { request, data_file, json } => {
            let mut parsed = load_request(&request)
                .with_context(|| format!("Failed to read request {}", request.display()))?;
            if let Some(path) = data_file {
                let data = load_supplemental(&path)
                    .with_context(|| format!("Failed to read data file {}", path.display()))?;
                parsed.merge_supplemental(&data);
            }
            (parsed, json)
        }
        Command::Csv { listings, json } => {
            let listing = load_first_listing(&listings)
                .with_context(|| format!("Failed to read listings {}", listings.display()))?;
            (AnalysisRequest::for_property(listing), json)
        }
    };

    validate_request(&request)?;
    let analysis = runner.run(&request);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analysis);
    }

    Ok(())
}

fn print_report(analysis: &DealAnalysis) {
    let facts = &analysis.property;
    let verdict = if analysis.meets_criteria { "MEETS CRITERIA" } else { "DOES NOT MEET CRITERIA" };

    println!("Deal Analyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Property: {}", analysis.property_id);
    println!("  Address: {}, {}, {} {}", facts.address, facts.city, facts.state, facts.zip_code);
    println!("  Type: {}", facts.property_type);
    println!("  Purchase Price: ${:.2}", facts.purchase_price);
    println!("  Monthly Rent: ${:.2}", facts.monthly_rent);
    println!("  Funding: {}", analysis.funding_source);
    println!();

    println!("Upfront Cash:");
    println!("  Down Payment: ${:.2}", analysis.calculated_downpayment);
    println!("  Closing Costs: ${:.2}", analysis.calculated_closing_costs);
    println!("  Initial Fixed Costs: ${:.2}", analysis.calculated_initial_fixed_costs);
    println!("  Total Cash Needed: ${:.2}", analysis.total_cash_needed);
    println!();

    let expenses = &analysis.monthly_expenses;
    println!("Monthly Expenses:");
    println!("  {:<14} ${:>10.2}", "Mortgage", expenses.mortgage);
    println!("  {:<14} ${:>10.2}", "Property Tax", expenses.property_tax);
    println!("  {:<14} ${:>10.2}", "Insurance", expenses.insurance);
    println!("  {:<14} ${:>10.2}", "Vacancy", expenses.vacancy);
    println!("  {:<14} ${:>10.2}", "Maintenance", expenses.maintenance);
    println!("  {:<14} ${:>10.2}", "Management", expenses.management);
    println!("  {:<14} ${:>10.2}", "Utilities", expenses.utilities);
    println!("  {:<14} ${:>10.2}", "Cleaning", expenses.cleaning);
    println!("  {:<14} ${:>10.2}", "Supplies", expenses.supplies);
    println!("  {:<14} ${:>10.2}", "Other", expenses.other);
    println!("  {:<14} ${:>10.2}", "Operating", expenses.operating());
    println!("  {:<14} ${:>10.2}", "Total", analysis.total_monthly_expenses);
    println!();

    println!("Returns:");
    println!("  Monthly Cash Flow: ${:.2}", analysis.cash_flow);
    println!("  Cash-on-Cash: {:.2}%", analysis.coc_return * 100.0);
    println!("  Cap Rate: {:.2}%", analysis.cap_rate * 100.0);
    println!("  1% Rule: {}", if analysis.passes_1_percent_rule { "pass" } else { "fail" });

    if let (Some(revenue), Some(gross_yield), Some(net)) = (
        analysis.projected_annual_revenue,
        analysis.projected_gross_yield,
        analysis.str_net_income,
    ) {
        println!();
        println!("Short-Term Rental:");
        println!("  Projected Annual Revenue: ${:.2}", revenue);
        println!("  Gross Yield: {:.2}%", gross_yield * 100.0);
        println!("  Monthly Net Income: ${:.2}", net);
    }

    println!("\nVerdict: {}", verdict);
}
