//! Error types for yield schedule and vault tooling

use thiserror::Error;

/// Result type alias for yield vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors raised by the calculator, parsers and loaders
///
/// Calculator errors are caller errors: they are synchronous and never
/// worth retrying.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Lock period outside the fixed 30/90/180/365-day table
    #[error("Unknown lock period: {0}")]
    UnknownLockPeriod(String),

    /// Negative, non-finite, malformed or out-of-range amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Early-exit penalty above 100%
    #[error("Invalid penalty: {0} basis points exceeds 10000")]
    InvalidPenalty(u32),

    /// Deposit smaller than the configured minimum
    #[error("Deposit of {amount} micro-STX is below the minimum of {minimum} micro-STX")]
    BelowMinimumDeposit { amount: u64, minimum: u64 },

    /// Deposit larger than the pool maximum
    #[error("Deposit of {amount} micro-STX is above the maximum of {maximum} micro-STX")]
    AboveMaximumDeposit { amount: u64, maximum: u64 },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// True for errors caused by bad caller input rather than the environment
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            VaultError::UnknownLockPeriod(_)
                | VaultError::InvalidAmount(_)
                | VaultError::InvalidPenalty(_)
                | VaultError::BelowMinimumDeposit { .. }
                | VaultError::AboveMaximumDeposit { .. }
        )
    }
}
