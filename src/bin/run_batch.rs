//! Run every loan in a CSV book and write a per-loan summary
//!
//! Usage: run_batch <loans.csv> [--out summary.csv] [--horizon MONTHS]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use loan_engine::batch::BatchRunner;
use loan_engine::input::load_loans;

#[derive(Parser)]
#[command(name = "run_batch", about = "Simulate a book of loans in parallel")]
struct Args {
    /// Loans CSV (id,principal,annual_rate_percent,term_months,extra_monthly)
    loans: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_summary.csv")]
    out: PathBuf,

    /// Stop every loan after this many months
    #[arg(long)]
    horizon: Option<u32>,
}

/// One line of the summary file
#[derive(Debug, Serialize)]
struct SummaryRow {
    id: String,
    months: u32,
    base_payment: f64,
    total_payment: f64,
    total_interest: f64,
    final_balance: f64,
    termination: String,
    error: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let loans = load_loans(&args.loans)?;
    println!("Loaded {} loans in {:?}", loans.len(), start.elapsed());

    let runner = match args.horizon {
        Some(months) => BatchRunner::with_horizon(months),
        None => BatchRunner::new(),
    };

    let run_start = Instant::now();
    let outcomes = runner.run_batch(&loans);
    println!("Simulated in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let mut total_principal = 0.0;
    let mut total_interest = 0.0;
    let mut failures = 0usize;

    for (loan, outcome) in loans.iter().zip(&outcomes) {
        let row = match &outcome.result {
            Ok((summary, termination)) => {
                total_principal += loan.principal;
                total_interest += summary.total_interest;
                SummaryRow {
                    id: outcome.id.clone(),
                    months: summary.months,
                    base_payment: summary.base_payment,
                    total_payment: summary.total_payment,
                    total_interest: summary.total_interest,
                    final_balance: summary.final_balance,
                    termination: format!("{:?}", termination),
                    error: String::new(),
                }
            }
            Err(e) => {
                failures += 1;
                SummaryRow {
                    id: outcome.id.clone(),
                    months: 0,
                    base_payment: 0.0,
                    total_payment: 0.0,
                    total_interest: 0.0,
                    final_balance: loan.principal,
                    termination: String::new(),
                    error: e.to_string(),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.out.display());
    println!("\nBook Summary:");
    println!("  Loans:          {}", loans.len());
    println!("  Failed:         {}", failures);
    println!("  Principal:      ${:.0}", total_principal);
    println!("  Total interest: ${:.0}", total_interest);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
