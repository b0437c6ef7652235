//! Yield Vault - yield schedule calculator and tooling for the time-locked yield-vault contract
//!
//! This library provides:
//! - The fixed lock-period/rate table and the yield, maturity and early-exit math
//! - Exact STX amount parsing and formatting
//! - Vault position status, accrual and withdrawal quotes
//! - CSV position loading and parallel portfolio reports
//! - Read-only call and transaction payload builders for the contract
//! - An explicit metrics store for contract-call events

pub mod error;
pub mod amount;
pub mod schedule;
pub mod vault;
pub mod contract;
pub mod config;
pub mod metrics;

// Re-export commonly used types
pub use error::{Result, VaultError};
pub use schedule::{
    LockPeriod, LockPeriodOption, YieldQuote, rate_for_period, expected_yield, maturity_value,
    early_exit_value,
};
pub use vault::{VaultPosition, PortfolioReport};
pub use config::AppConfig;
pub use metrics::MetricsStore;
