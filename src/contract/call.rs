//! Read-only contract calls

use crate::config::AppConfig;
use crate::schedule::LockPeriod;
use serde::Serialize;

/// Read-only functions exposed by the vault contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOnlyFunction {
    GetTvl,
    GetVault(u64),
    GetPool(u64),
    CalculateYield(u64),
    IsVaultUnlocked(u64),
    GetCurrentTime,
    GetUserStats(String),
    GetYieldRate(LockPeriod),
}

impl ReadOnlyFunction {
    pub fn name(&self) -> &'static str {
        match self {
            ReadOnlyFunction::GetTvl => "get-tvl",
            ReadOnlyFunction::GetVault(_) => "get-vault",
            ReadOnlyFunction::GetPool(_) => "get-pool",
            ReadOnlyFunction::CalculateYield(_) => "calculate-yield",
            ReadOnlyFunction::IsVaultUnlocked(_) => "is-vault-unlocked",
            ReadOnlyFunction::GetCurrentTime => "get-current-time",
            ReadOnlyFunction::GetUserStats(_) => "get-user-stats",
            ReadOnlyFunction::GetYieldRate(_) => "get-yield-rate",
        }
    }

    /// Encoded call arguments
    pub fn arguments(&self) -> Vec<String> {
        match self {
            ReadOnlyFunction::GetTvl | ReadOnlyFunction::GetCurrentTime => Vec::new(),
            ReadOnlyFunction::GetVault(id)
            | ReadOnlyFunction::GetPool(id)
            | ReadOnlyFunction::CalculateYield(id)
            | ReadOnlyFunction::IsVaultUnlocked(id) => vec![encode_uint(*id as u128)],
            ReadOnlyFunction::GetUserStats(user) => vec![encode_principal(user)],
            // The contract keys rates by lock length in seconds
            ReadOnlyFunction::GetYieldRate(period) => vec![encode_uint(period.seconds() as u128)],
        }
    }
}

/// JSON body of a `call-read` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadOnlyBody {
    pub sender: String,
    pub arguments: Vec<String>,
}

/// A fully-formed `call-read` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadOnlyCall {
    pub function: String,
    pub url: String,
    pub body: ReadOnlyBody,
}

impl ReadOnlyCall {
    pub fn new(config: &AppConfig, function: ReadOnlyFunction) -> Self {
        let url = format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            config.api_base().trim_end_matches('/'),
            config.contract_address,
            config.contract_name,
            function.name()
        );
        log::debug!("Built read-only call {}", url);

        Self {
            function: function.name().to_string(),
            url,
            body: ReadOnlyBody {
                sender: config.sender().to_string(),
                arguments: function.arguments(),
            },
        }
    }
}

/// `0x` followed by 32 lower-case hex digits
pub fn encode_uint(value: u128) -> String {
    format!("0x{:032x}", value)
}

/// `0x` followed by the hex of the principal's bytes
pub fn encode_principal(principal: &str) -> String {
    let mut out = String::with_capacity(2 + principal.len() * 2);
    out.push_str("0x");
    for byte in principal.as_bytes() {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}
