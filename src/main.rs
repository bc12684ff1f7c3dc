//! Loan Engine CLI
//!
//! Every subcommand reads a JSON request from `--input <file>` (or stdin) and prints
//! the JSON outcome.
//!
//! ```bash
//! echo '{"principal": 100000, "annual_rate_percent": 6, "term_months": 360}' \
//!     | loan_engine schedule --output csv
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use loan_engine::error::outcome_json;
use loan_engine::products;
use loan_engine::scenarios;
use loan_engine::schedule::{
    aggregate_yearly, LoanTerms, PaymentPolicy, ScheduleResult, ScheduleSimulator, YearlyOptions,
};

/// Amortization schedules and loan scenario calculators
#[derive(Parser)]
#[command(name = "loan_engine", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Month-by-month amortization schedule
    Schedule {
        #[command(flatten)]
        args: InputArgs,
        #[arg(long, value_enum, default_value = "json")]
        output: OutputFormat,
    },
    /// Schedule folded into yearly records
    Yearly(InputArgs),
    /// Compare keeping the current rate against a rate change
    RateChange(InputArgs),
    /// Loan-to-value ratio and band
    Ltv(InputArgs),
    /// Stay-versus-switch remortgage cost comparison
    Remortgage(InputArgs),
    /// Offset mortgage savings
    Offset(InputArgs),
    /// Maximum borrowing capacity
    Borrowing(InputArgs),
    /// Buy-to-let cash flow projection
    BuyToLet(InputArgs),
    /// General loan with overpayments and fees
    Loan(InputArgs),
    /// Home loan with taxes, insurance and PMI
    Mortgage(InputArgs),
    /// Auto loan
    Auto(InputArgs),
    /// Credit card payoff plan
    CreditCard(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// JSON request file; reads stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

/// Request body for `schedule` and `yearly`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScheduleRequest {
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
    policy: PaymentPolicy,
    yearly: YearlyOptions,
}

impl ScheduleRequest {
    fn simulate(&self) -> ScheduleResult {
        let terms = LoanTerms::new(self.principal, self.annual_rate_percent, self.term_months);
        ScheduleSimulator::new(terms, self.policy.clone()).run()
    }
}

fn read_request<T: DeserializeOwned>(args: &InputArgs) -> Result<T> {
    let mut buffer = String::new();
    match &args.input {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("opening {}", path.display()))?
                .read_to_string(&mut buffer)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading request from stdin")?;
        }
    }
    serde_json::from_str(&buffer).context("parsing JSON request")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_schedule_csv(schedule: &ScheduleResult) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for entry in &schedule.entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Schedule { args, output } => {
            let request: ScheduleRequest = read_request(&args)?;
            let schedule = request.simulate();
            return match output {
                OutputFormat::Json => print_json(&schedule),
                OutputFormat::Csv => write_schedule_csv(&schedule),
            };
        }
        Commands::Yearly(args) => {
            let request: ScheduleRequest = read_request(&args)?;
            let records = aggregate_yearly(&request.simulate(), &request.yearly);
            return print_json(&records);
        }
        Commands::RateChange(args) => {
            outcome_json(&scenarios::compare_rate_change(&read_request(&args)?))
        }
        Commands::Ltv(args) => outcome_json(&scenarios::calculate_ltv(&read_request(&args)?)),
        Commands::Remortgage(args) => {
            outcome_json(&scenarios::analyze_remortgage(&read_request(&args)?))
        }
        Commands::Offset(args) => outcome_json(&scenarios::simulate_offset(&read_request(&args)?)),
        Commands::Borrowing(args) => {
            outcome_json(&scenarios::solve_borrowing_capacity(&read_request(&args)?))
        }
        Commands::BuyToLet(args) => {
            outcome_json(&scenarios::project_buy_to_let(&read_request(&args)?))
        }
        Commands::Loan(args) => outcome_json(&products::calculate_loan(&read_request(&args)?)),
        Commands::Mortgage(args) => {
            outcome_json(&products::calculate_mortgage(&read_request(&args)?))
        }
        Commands::Auto(args) => outcome_json(&products::calculate_auto_loan(&read_request(&args)?)),
        Commands::CreditCard(args) => {
            outcome_json(&products::calculate_card_payoff(&read_request(&args)?))
        }
    };

    print_json(&outcome)
}
