//! Lock periods and the fixed annual rate table
//!
//! The table is the single source of truth for lock durations and rates.
//! Every other part of the crate (quotes, contract payloads, reports) resolves
//! periods through it.

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// One of the four lock durations accepted by the vault contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LockPeriod {
    /// 30 days, 3% APY
    Days30 = 0,
    /// 90 days, 5% APY
    Days90 = 1,
    /// 180 days, 8% APY
    Days180 = 2,
    /// 365 days, 12% APY
    Days365 = 3,
}

/// Immutable record describing one lock period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockPeriodOption {
    pub period: LockPeriod,
    pub period_days: u32,
    /// `period_days * 86400`
    pub period_seconds: u64,
    /// Annual rate in basis points (300 = 3%)
    pub annual_rate_bps: u32,
}

impl LockPeriodOption {
    const fn new(period: LockPeriod, period_days: u32, annual_rate_bps: u32) -> Self {
        Self {
            period,
            period_days,
            period_seconds: period_days as u64 * SECONDS_PER_DAY,
            annual_rate_bps,
        }
    }
}

/// Lock period table, indexed by `LockPeriod as usize`
pub const LOCK_PERIOD_TABLE: [LockPeriodOption; 4] = [
    LockPeriodOption::new(LockPeriod::Days30, 30, 300),
    LockPeriodOption::new(LockPeriod::Days90, 90, 500),
    LockPeriodOption::new(LockPeriod::Days180, 180, 800),
    LockPeriodOption::new(LockPeriod::Days365, 365, 1200),
];

impl LockPeriod {
    /// All periods, shortest first
    pub const ALL: [LockPeriod; 4] = [
        LockPeriod::Days30,
        LockPeriod::Days90,
        LockPeriod::Days180,
        LockPeriod::Days365,
    ];

    /// Table entry for this period
    pub fn option(self) -> &'static LockPeriodOption {
        &LOCK_PERIOD_TABLE[self as usize]
    }

    pub fn days(self) -> u32 {
        self.option().period_days
    }

    pub fn seconds(self) -> u64 {
        self.option().period_seconds
    }

    pub fn annual_rate_bps(self) -> u32 {
        self.option().annual_rate_bps
    }

    /// CLI label as used by the interaction script (`30_DAYS`)
    pub fn label(self) -> &'static str {
        match self {
            LockPeriod::Days30 => "30_DAYS",
            LockPeriod::Days90 => "90_DAYS",
            LockPeriod::Days180 => "180_DAYS",
            LockPeriod::Days365 => "365_DAYS",
        }
    }

    /// Resolve a period from its length in days
    pub fn from_days(days: u32) -> Result<Self> {
        LOCK_PERIOD_TABLE
            .iter()
            .find(|opt| opt.period_days == days)
            .map(|opt| opt.period)
            .ok_or_else(|| VaultError::UnknownLockPeriod(format!("{} days", days)))
    }

    /// Resolve a period from its length in seconds, as passed to the contract
    pub fn from_seconds(seconds: u64) -> Result<Self> {
        LOCK_PERIOD_TABLE
            .iter()
            .find(|opt| opt.period_seconds == seconds)
            .map(|opt| opt.period)
            .ok_or_else(|| VaultError::UnknownLockPeriod(format!("{} seconds", seconds)))
    }
}

/// Annual rate in basis points for a lock period given in days
///
/// Only 30, 90, 180 and 365 are valid. There is no interpolation and no
/// fallback rate.
pub fn rate_for_period(period_days: u32) -> Result<u32> {
    LockPeriod::from_days(period_days).map(LockPeriod::annual_rate_bps)
}

/// Annual rate in basis points for a lock period given in seconds
///
/// Mirrors the contract's `get-yield-rate`.
pub fn rate_for_seconds(period_seconds: u64) -> Result<u32> {
    LockPeriod::from_seconds(period_seconds).map(LockPeriod::annual_rate_bps)
}

impl fmt::Display for LockPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LockPeriod {
    type Err = VaultError;

    /// Accepts a label (`90_DAYS`, case-insensitive) or a bare day count (`90`)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(period) = LockPeriod::ALL
            .iter()
            .find(|p| p.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*period);
        }

        match trimmed.parse::<u32>() {
            Ok(days) => LockPeriod::from_days(days),
            Err(_) => Err(VaultError::UnknownLockPeriod(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for LockPeriod {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LockPeriod> for String {
    fn from(period: LockPeriod) -> Self {
        period.label().to_string()
    }
}
