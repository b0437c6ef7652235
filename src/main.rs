//! Yield Vault CLI
//!
//! Quotes yields and builds contract requests for the yield-vault contract.
//! Nothing is broadcast: transactions are printed for a wallet to sign.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use yield_vault::{
    AppConfig, LockPeriod, MetricsStore, VaultPosition, YieldQuote,
    amount::{format_stx, parse_micro_stx, parse_stx},
    contract::{
        DepositRequest, Network, PoolLimits, ReadOnlyCall, ReadOnlyFunction, TransactionPayload,
    },
    metrics::load_events,
    schedule::{LOCK_PERIOD_TABLE, early_exit_value_with_penalty},
};

#[derive(Parser)]
#[command(name = "yield-vault")]
#[command(version = "0.1.0")]
#[command(about = "Yield schedule calculator and request builder for the yield-vault contract", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network override: testnet or mainnet
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the lock period and APY table
    Rates,

    /// Quote expected yield, maturity value and early-exit value
    Quote {
        /// Principal (micro-STX, or STX with --stx)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// 30_DAYS, 90_DAYS, 180_DAYS or 365_DAYS
        period: String,
        /// Amount is in STX
        #[arg(long)]
        stx: bool,
    },

    /// Early-exit payout for a principal
    EarlyExit {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Penalty in basis points (default from config, 1000 = 10%)
        #[arg(long)]
        penalty_bps: Option<u32>,
        #[arg(long)]
        stx: bool,
    },

    /// Status and withdrawal quote for a vault position
    Position {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        period: String,
        /// Deposit time, unix seconds
        deposit_time: i64,
        /// Valuation time, unix seconds (default: now)
        #[arg(long)]
        now: Option<i64>,
        #[arg(long)]
        stx: bool,
    },

    /// Build a get-tvl read-only call
    GetTvl,

    /// Build a get-vault read-only call
    GetVault { vault_id: u64 },

    /// Build a get-pool read-only call
    GetPool { pool_id: u64 },

    /// Build a calculate-yield read-only call
    CalculateYield { vault_id: u64 },

    /// Build an is-vault-unlocked read-only call
    CheckUnlock { vault_id: u64 },

    /// Build a get-yield-rate read-only call
    YieldRate { period: String },

    /// Validate a deposit and print its transaction payload
    Deposit {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        period: String,
        pool_id: u64,
        #[arg(long)]
        stx: bool,
    },

    /// Print a create-pool transaction payload (admin only)
    CreatePool {
        name: String,
        #[arg(allow_hyphen_values = true)]
        min_deposit: String,
        #[arg(allow_hyphen_values = true)]
        max_deposit: String,
        #[arg(long)]
        stx: bool,
    },

    /// Print a withdraw transaction payload
    Withdraw {
        vault_id: u64,
        /// Withdraw before unlock (10% penalty, no yield)
        #[arg(long)]
        emergency: bool,
    },

    /// Replay contract-call events from a JSON file and print metrics
    Metrics {
        events: PathBuf,
        /// TVL in micro-STX as read from get-tvl
        #[arg(long)]
        tvl: Option<String>,
    },

    /// Show contract and schedule information
    Info,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Rates => print_rates(cli.json)?,

        Commands::Quote { amount, period, stx } => {
            let principal = parse_amount(&amount, stx)?;
            let period: LockPeriod = period.parse()?;
            let quote = YieldQuote::with_penalty(principal, period, config.early_exit_penalty_bps)?;
            if cli.json {
                print_json(&quote)?;
            } else {
                print_quote(&quote);
            }
        }

        Commands::EarlyExit { amount, penalty_bps, stx } => {
            let principal = parse_amount(&amount, stx)?;
            let penalty = penalty_bps.unwrap_or(config.early_exit_penalty_bps);
            let payout = early_exit_value_with_penalty(principal, penalty)?;
            if cli.json {
                print_json(&serde_json::json!({
                    "principal": principal,
                    "penalty_bps": penalty,
                    "payout": payout,
                }))?;
            } else {
                println!("Principal:     {} STX", format_stx(principal));
                println!("Penalty:       {:.2}%", penalty as f64 / 100.0);
                println!("Payout:        {} STX", format_stx(payout));
                println!("Yield is forfeited in full on early exit.");
            }
        }

        Commands::Position { amount, period, deposit_time, now, stx } => {
            let principal = parse_amount(&amount, stx)?;
            let position = VaultPosition::new(0, principal, period.parse()?, deposit_time);
            let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());
            print_position(&position, now, config.early_exit_penalty_bps, cli.json)?;
        }

        Commands::GetTvl => print_call(&config, ReadOnlyFunction::GetTvl, cli.json)?,
        Commands::GetVault { vault_id } => {
            print_call(&config, ReadOnlyFunction::GetVault(vault_id), cli.json)?
        }
        Commands::GetPool { pool_id } => {
            print_call(&config, ReadOnlyFunction::GetPool(pool_id), cli.json)?
        }
        Commands::CalculateYield { vault_id } => {
            print_call(&config, ReadOnlyFunction::CalculateYield(vault_id), cli.json)?
        }
        Commands::CheckUnlock { vault_id } => {
            print_call(&config, ReadOnlyFunction::IsVaultUnlocked(vault_id), cli.json)?
        }
        Commands::YieldRate { period } => {
            print_call(&config, ReadOnlyFunction::GetYieldRate(period.parse()?), cli.json)?
        }

        Commands::Deposit { amount, period, pool_id, stx } => {
            let request = DepositRequest::new(parse_amount(&amount, stx)?, period.parse()?, pool_id);
            let payload = TransactionPayload::deposit(&config, &request)?;
            if cli.json {
                print_json(&payload)?;
            } else {
                println!("Preparing deposit transaction...");
                println!("  Amount:      {} STX", format_stx(request.amount));
                println!("  Lock Period: {}", request.period);
                println!("  Pool ID:     {}", request.pool_id);
                println!();
                print_quote(&YieldQuote::with_penalty(
                    request.amount,
                    request.period,
                    config.early_exit_penalty_bps,
                )?);
                println!("\nTransaction data:");
                print_json(&payload)?;
                println!("\nTo execute this transaction, sign and broadcast it with a Stacks wallet");
            }
        }

        Commands::CreatePool { name, min_deposit, max_deposit, stx } => {
            let pool = PoolLimits::new(
                name,
                parse_amount(&min_deposit, stx)?,
                parse_amount(&max_deposit, stx)?,
            );
            let payload = TransactionPayload::create_pool(&config, &pool)?;
            if !cli.json {
                println!("Preparing create-pool '{}'...", pool.name);
                println!("  Deposits: {} to {} STX", format_stx(pool.min_deposit), format_stx(pool.max_deposit));
                println!("\nTransaction data:");
            }
            print_json(&payload)?;
        }

        Commands::Withdraw { vault_id, emergency } => {
            let payload = if emergency {
                TransactionPayload::emergency_withdraw(&config, vault_id)
            } else {
                TransactionPayload::withdraw(&config, vault_id)
            };
            if !cli.json {
                println!("Preparing {} for vault {}...", payload.function_name.name(), vault_id);
                println!("\nTransaction data:");
            }
            print_json(&payload)?;
        }

        Commands::Metrics { events, tvl } => {
            let events = load_events(&events)
                .with_context(|| format!("Failed to load events from {}", events.display()))?;
            let mut store = MetricsStore::new();
            store.record_all(&events)?;
            if let Some(tvl) = tvl {
                store.set_observed_tvl(parse_micro_stx(&tvl)?);
            }
            let snapshot = store.snapshot();
            if cli.json {
                print_json(&snapshot)?;
            } else {
                println!("Metrics ({} events)", events.len());
                println!("  Unique users:       {}", snapshot.unique_users);
                println!("  Daily active users: {}", snapshot.daily_active_users);
                println!("  Transactions:       {}", snapshot.transactions);
                println!("  Fees generated:     {} STX", format_stx(snapshot.fees));
                println!("  Deposits:           {} ({} micro-STX)", snapshot.deposits, snapshot.deposit_volume);
                println!("  Withdrawals:        {} ({} micro-STX)", snapshot.withdrawals, snapshot.withdrawal_volume);
                println!("  Emergency exits:    {}", snapshot.emergency_withdrawals);
                match snapshot.observed_tvl {
                    Some(tvl) => println!("  TVL (get-tvl):      {} STX", format_stx(tvl)),
                    None => println!("  TVL (get-tvl):      not observed"),
                }
            }
        }

        Commands::Info => {
            println!("Yield Vault Contract Info");
            println!("=========================\n");
            println!("  Contract: {}", config.contract_id());
            println!("  Network:  {}", config.network);
            println!("  API:      {}", config.api_base());
            println!("  Fee:      {} STX", format_stx(config.fee));
            println!("  Minimum deposit: {} STX", format_stx(config.min_deposit));
            println!("  Early exit penalty: {:.2}% of principal, yield forfeited", config.early_exit_penalty_bps as f64 / 100.0);
            println!();
            print_rates(false)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(network) = &cli.network {
        config.network = network.parse::<Network>()?;
    }
    Ok(config)
}

fn parse_amount(text: &str, stx: bool) -> Result<u64> {
    let amount = if stx { parse_stx(text)? } else { parse_micro_stx(text)? };
    Ok(amount)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rates(json: bool) -> Result<()> {
    if json {
        return print_json(&LOCK_PERIOD_TABLE);
    }
    println!("{:<10} {:>6} {:>10} {:>6}", "Period", "Days", "Seconds", "APY");
    println!("{}", "-".repeat(35));
    for opt in LOCK_PERIOD_TABLE.iter() {
        println!(
            "{:<10} {:>6} {:>10} {:>5.2}%",
            opt.period.label(),
            opt.period_days,
            opt.period_seconds,
            opt.annual_rate_bps as f64 / 100.0
        );
    }
    Ok(())
}

fn print_quote(quote: &YieldQuote) {
    println!("Expected Returns ({}, {:.2}% APY)", quote.period, quote.annual_rate_bps as f64 / 100.0);
    println!("  Principal:         {} STX", format_stx(quote.principal));
    println!("  Expected yield:   +{} STX", format_stx(quote.expected_yield));
    println!("  Total at maturity: {} STX", format_stx(quote.maturity_value));
    println!("  Early exit payout: {} STX (yield forfeited)", format_stx(quote.early_exit_value));
}

fn print_position(position: &VaultPosition, now: i64, penalty_bps: u32, json: bool) -> Result<()> {
    let withdrawal = position.withdrawal_quote(now, penalty_bps)?;
    if json {
        return print_json(&serde_json::json!({
            "position": position,
            "status": position.status(now),
            "unlock_timestamp": position.unlock_timestamp(),
            "days_remaining": position.days_remaining(now),
            "accrued_yield": position.accrued_yield(now),
            "withdrawal": withdrawal,
        }));
    }

    let unlock = position
        .unlock_date()
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "out of range".to_string());

    println!("Vault position");
    println!("  Amount:      {} STX", format_stx(position.principal));
    println!("  Lock period: {} ({:.2}% APY)", position.period, position.period.annual_rate_bps() as f64 / 100.0);
    println!("  Unlock date: {}", unlock);
    println!("  Status:      {:?}, {} days left", position.status(now), position.days_remaining(now));
    println!("  Earned:      +{} STX", format_stx(position.accrued_yield(now)));
    println!(
        "  Withdraw now: {:?}, payout {} STX (penalty {} STX, forfeited yield {} STX)",
        withdrawal.kind,
        format_stx(withdrawal.payout),
        format_stx(withdrawal.penalty),
        format_stx(withdrawal.forfeited_yield)
    );
    Ok(())
}

fn print_call(config: &AppConfig, function: ReadOnlyFunction, json: bool) -> Result<()> {
    let call = ReadOnlyCall::new(config, function);
    if !json {
        println!("Calling {}...", call.function);
        println!("POST {}", call.url);
    }
    print_json(&call.body)
}
