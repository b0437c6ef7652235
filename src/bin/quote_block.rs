//! Quote an entire block of vault positions from a CSV file
//!
//! Writes one row per position and prints per-period totals.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use yield_vault::{
    AppConfig, PortfolioReport,
    amount::format_stx,
    vault::loader::load_positions,
};

#[derive(Parser)]
#[command(name = "quote_block")]
#[command(about = "Quote every vault position in a CSV block", long_about = None)]
struct Args {
    /// Positions CSV (VaultID, Owner, Amount, LockPeriod, DepositTime)
    positions: PathBuf,

    /// Valuation time, unix seconds (default: now)
    #[arg(long)]
    now: Option<i64>,

    /// JSON configuration file (supplies the early-exit penalty)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Early-exit penalty in basis points, overrides the config
    #[arg(long)]
    penalty_bps: Option<u32>,

    /// Output CSV
    #[arg(short, long, default_value = "block_quote_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    let penalty_bps = args.penalty_bps.unwrap_or(config.early_exit_penalty_bps);

    let start = Instant::now();
    println!("Loading positions from {}...", args.positions.display());

    let positions = load_positions(&args.positions)
        .with_context(|| format!("Failed to load positions from {}", args.positions.display()))?;
    println!("Loaded {} positions in {:?}", positions.len(), start.elapsed());

    let now = args.now.unwrap_or_else(|| chrono::Utc::now().timestamp());

    println!("Quoting positions (early-exit penalty {} bps)...", penalty_bps);
    let quote_start = Instant::now();
    let report = PortfolioReport::build(&positions, now, penalty_bps)?;
    println!("Quotes complete in {:?}", quote_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for row in &report.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    let as_of = chrono::DateTime::from_timestamp(now, 0)
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| now.to_string());

    println!("\nBlock Summary (as of {}):", as_of);
    println!(
        "  {:<10} {:>9} {:>7} {:>9} {:>20} {:>18} {:>18}",
        "Period", "Positions", "Locked", "Unlocked", "Principal", "Accrued", "Expected"
    );
    for breakdown in &report.by_period {
        let t = &breakdown.totals;
        println!(
            "  {:<10} {:>9} {:>7} {:>9} {:>20} {:>18} {:>18}",
            breakdown.period.label(),
            t.positions,
            t.locked,
            t.unlocked,
            t.principal,
            t.accrued_yield,
            t.expected_yield
        );
    }

    let t = &report.totals;
    println!(
        "  {:<10} {:>9} {:>7} {:>9} {:>20} {:>18} {:>18}",
        "Total", t.positions, t.locked, t.unlocked, t.principal, t.accrued_yield, t.expected_yield
    );
    if let Ok(principal) = u64::try_from(t.principal) {
        println!("\n  Principal: {} STX", format_stx(principal));
    }
    println!("  Payout if all withdrawn now: {} micro-STX", t.withdrawal_payout);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
