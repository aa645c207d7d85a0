//! Analyze every listing in a CSV export
//!
//! Writes one summary row per listing for spreadsheet review

use anyhow::{Context, Result};
use clap::Parser;
use deal_analyzer::criteria::{load_criteria, load_default_criteria};
use deal_analyzer::property::load_listings;
use deal_analyzer::{AnalysisRunner, FundingSource};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Analyze all listings in a CSV export")]
struct BatchArgs {
    /// Listings CSV
    listings: PathBuf,

    #[arg(long, short, default_value = "batch_analysis_output.csv")]
    output: PathBuf,

    #[arg(long, env = "DEAL_CRITERIA_PATH")]
    criteria: Option<PathBuf>,

    #[arg(long)]
    funding_source: Option<FundingSource>,

    #[arg(long, env = "MORTGAGE_RATE")]
    mortgage_rate: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = BatchArgs::parse();

    let start = Instant::now();
    println!("Loading listings from {}...", args.listings.display());

    let listings = load_listings(&args.listings)
        .with_context(|| format!("Failed to load listings from {}", args.listings.display()))?;
    println!("Loaded {} listings in {:?}", listings.len(), start.elapsed());

    let criteria = match &args.criteria {
        Some(path) => load_criteria(path)
            .with_context(|| format!("Failed to load criteria from {}", path.display()))?,
        None => load_default_criteria(),
    };
    let runner = AnalysisRunner::with_criteria(criteria)
        .with_mortgage_rate(args.mortgage_rate)
        .with_funding_source(args.funding_source);

    println!(
        "Criteria: max price ${:.0}, CoC minimum {:.1}%, cap minimum {:.1}%",
        runner.criteria().max_purchase_price,
        runner.criteria().coc_minimum_min * 100.0,
        runner.criteria().cap_minimum_min * 100.0
    );
    println!(
        "Financing: {} at {}",
        runner.funding_source().map_or("listing default".to_string(), |s| s.to_string()),
        runner
            .mortgage_rate()
            .map_or("the default rate".to_string(), |r| format!("{:.3}%", r * 100.0))
    );

    println!("Running analyses...");
    let run_start = Instant::now();
    let analyses = runner.run_batch(&listings);
    println!("Analyses complete in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for analysis in &analyses {
        writer.serialize(analysis.summary())?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());

    let passing: Vec<_> = analyses.iter().filter(|a| a.meets_criteria).collect();
    println!("\nBatch Summary:");
    println!("  Listings analyzed: {}", analyses.len());
    println!("  Meeting criteria:  {}", passing.len());

    if let Some(best) = analyses
        .iter()
        .max_by(|a, b| a.coc_return.total_cmp(&b.coc_return))
    {
        println!(
            "  Best cash-on-cash: {} ({}) at {:.2}%",
            best.property_id,
            best.property.address,
            best.coc_return * 100.0
        );
    }

    for analysis in passing {
        println!(
            "  PASS {:<8} {:<40} cash flow ${:>9.2}/mo  cap {:>6.2}%",
            analysis.property_id,
            analysis.property.address,
            analysis.cash_flow,
            analysis.cap_rate * 100.0
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
