//! DCF valuation CLI
//!
//! `dcf value` values one model from a JSON request (optionally with a CSV
//! rate table); `dcf batch` values a JSON array of requests in parallel.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dcf_valuation::inputs::loader::{load_inputs, load_rate_table, load_requests};
use dcf_valuation::runner::write_batch_csv;
use dcf_valuation::{RateUnit, ValuationRunner};

#[derive(Parser, Debug)]
#[command(name = "dcf", version, about = "Discounted-cash-flow equity valuation")]
struct Cli {
    /// Unit of rate inputs: fraction (0.08) or percent (8)
    #[arg(long, global = true, env = "DCF_RATE_UNITS", default_value = "fraction")]
    units: RateUnit,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Value a single model
    Value {
        /// JSON request file
        #[arg(short, long)]
        input: PathBuf,

        /// CSV rate table overriding the nine rate series in the request
        #[arg(short, long)]
        rates: Option<PathBuf>,

        /// Unit of the rate table, if different from --units
        #[arg(long, requires = "rates")]
        rates_units: Option<RateUnit>,

        /// Write the per-period schedule to this CSV file
        #[arg(short, long)]
        schedule: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Value a JSON array of requests in parallel
    Batch {
        /// JSON file holding an array of requests
        #[arg(short, long)]
        input: PathBuf,

        /// Summary CSV path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn run_value(
    unit: RateUnit,
    input: PathBuf,
    rates: Option<PathBuf>,
    rates_unit: RateUnit,
    schedule: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut inputs = load_inputs(&input, unit)
        .with_context(|| format!("Failed to load request from {}", input.display()))?;

    if let Some(path) = rates {
        let table = load_rate_table(&path, rates_unit)
            .with_context(|| format!("Failed to load rate table from {}", path.display()))?;
        inputs = inputs.with_rate_table(table);
    }

    log::info!("Valuing {} with {} rates", input.display(), unit);
    let result = inputs.compute()?;

    if let Some(path) = schedule {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        result.write_schedule_csv(BufWriter::new(file))?;
        println!("Schedule written to: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let historical = &inputs.historical;
    println!("DCF Valuation v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Base year:");
    println!("  Revenue: ${:.2}", historical.revenue);
    if let Some(margin) = historical.gross_margin() {
        println!("  Gross Margin: {:.2}%", margin * 100.0);
    }
    println!("  EBIT: ${:.2}", historical.ebit());
    println!("  Shares: {}", historical.share_count);
    println!();

    println!("{:>6} {:>14} {:>14} {:>14} {:>10} {:>14}",
        "Period", "Revenue", "EBIT", "UFCF", "DF", "PV UFCF");
    println!("{}", "-".repeat(78));
    for row in &result.schedule {
        println!("{:>6} {:>14.2} {:>14.2} {:>14.2} {:>10.4} {:>14.2}",
            row.period, row.revenue, row.ebit, row.ufcf, row.discount_factor, row.pv_ufcf);
    }
    println!("{:>6} {:>70.2}", "Sum", result.sum_pv_free_cash_flows);
    println!();

    let summary = result.summary();
    println!("{:<28} {:>16} {:>16}", "", "Perpetuity", "Exit Multiple");
    println!("{:<28} {:>16.2} {:>16.2}", "Terminal Value",
        result.terminal_value, result.terminal_value_exit_multiple);
    println!("{:<28} {:>16.2} {:>16.2}", "PV of Terminal Value",
        result.pv_terminal_value, result.pv_terminal_value_exit_multiple);
    println!("{:<28} {:>16.2} {:>16.2}", "Enterprise Value",
        summary.enterprise_value, summary.enterprise_value_exit_multiple);
    println!("{:<28} {:>16.2} {:>16.2}", "Equity Value",
        summary.equity_value, summary.equity_value_exit_multiple);
    println!("{:<28} {:>16.2} {:>16.2}", "Implied Share Price",
        summary.perp_price, summary.exit_multiple_price);

    Ok(())
}

fn run_batch(unit: RateUnit, input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let requests = load_requests(&input)
        .with_context(|| format!("Failed to load requests from {}", input.display()))?;
    log::info!("Valuing {} requests", requests.len());

    let runner = ValuationRunner::new(unit);
    let outcomes = runner.run_batch(&requests);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Unable to create {}", path.display()))?;
            write_batch_csv(&outcomes, BufWriter::new(file))?;
            eprintln!("Summary written to: {}", path.display());
        }
        None => write_batch_csv(&outcomes, io::stdout().lock())?,
    }

    if failed > 0 {
        bail!("{} of {} valuations failed", failed, outcomes.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Value { input, rates, rates_units, schedule, json } => {
            let rates_unit = rates_units.unwrap_or(cli.units);
            run_value(cli.units, input, rates, rates_unit, schedule, json)
        }
        Commands::Batch { input, output } => run_batch(cli.units, input, output),
    }
}
