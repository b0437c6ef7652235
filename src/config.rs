//! Application configuration
//!
//! Every field has a default matching the testnet deployment, so a config
//! file only needs the values that differ.

use crate::contract::Network;
use crate::error::{Result, VaultError};
use crate::schedule::{BASIS_POINTS_DENOMINATOR, DEFAULT_EARLY_EXIT_PENALTY_BPS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployed contract address on testnet
pub const DEFAULT_CONTRACT_ADDRESS: &str = "ST3DX5502GM712D9WC2X2MYC8HA5YYY8PM06GAPSZ";

/// Deployed contract name
pub const DEFAULT_CONTRACT_NAME: &str = "yield-vault";

/// Default transaction fee in micro-STX (0.01 STX)
pub const DEFAULT_FEE: u64 = 10_000;

/// Smallest deposit accepted before building a transaction (1 STX)
pub const DEFAULT_MIN_DEPOSIT: u64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    #[serde(default = "default_contract_name")]
    pub contract_name: String,

    #[serde(default)]
    pub network: Network,

    /// Overrides the network's API base URL
    #[serde(default)]
    pub api_base: Option<String>,

    /// Sender principal for read-only calls (defaults to the contract address)
    #[serde(default)]
    pub sender: Option<String>,

    /// Transaction fee in micro-STX
    #[serde(default = "default_fee")]
    pub fee: u64,

    /// Minimum deposit in micro-STX
    #[serde(default = "default_min_deposit")]
    pub min_deposit: u64,

    /// Pool maximum deposit in micro-STX, when the target pool has one
    #[serde(default)]
    pub max_deposit: Option<u64>,

    /// Penalty used for early-exit quotes
    #[serde(default = "default_penalty_bps")]
    pub early_exit_penalty_bps: u32,
}

fn default_contract_address() -> String { DEFAULT_CONTRACT_ADDRESS.to_string() }
fn default_contract_name() -> String { DEFAULT_CONTRACT_NAME.to_string() }
fn default_fee() -> u64 { DEFAULT_FEE }
fn default_min_deposit() -> u64 { DEFAULT_MIN_DEPOSIT }
fn default_penalty_bps() -> u32 { DEFAULT_EARLY_EXIT_PENALTY_BPS }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract_address(),
            contract_name: default_contract_name(),
            network: Network::default(),
            api_base: None,
            sender: None,
            fee: DEFAULT_FEE,
            min_deposit: DEFAULT_MIN_DEPOSIT,
            max_deposit: None,
            early_exit_penalty_bps: DEFAULT_EARLY_EXIT_PENALTY_BPS,
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.contract_address.trim().is_empty() {
            return Err(VaultError::Config("contract_address is empty".into()));
        }
        if self.contract_name.trim().is_empty() {
            return Err(VaultError::Config("contract_name is empty".into()));
        }
        if let Some(max) = self.max_deposit {
            if max < self.min_deposit {
                return Err(VaultError::Config(format!(
                    "max_deposit {} is below min_deposit {}",
                    max, self.min_deposit
                )));
            }
        }
        if self.early_exit_penalty_bps as u64 > BASIS_POINTS_DENOMINATOR {
            return Err(VaultError::InvalidPenalty(self.early_exit_penalty_bps));
        }
        Ok(())
    }

    /// API base URL, honoring the override
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.network.api_base())
    }

    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or(&self.contract_address)
    }

    /// `address.name`
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.api_base(), "https://api.testnet.hiro.so");
        assert_eq!(config.sender(), DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(
            config.contract_id(),
            "ST3DX5502GM712D9WC2X2MYC8HA5YYY8PM06GAPSZ.yield-vault"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AppConfig::from_json(r#"{ "network": "mainnet", "fee": 2500 }"#).unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.api_base(), "https://api.hiro.so");
        assert_eq!(config.fee, 2_500);
        assert_eq!(config.min_deposit, DEFAULT_MIN_DEPOSIT);
        assert_eq!(config.contract_name, DEFAULT_CONTRACT_NAME);
    }

    #[test]
    fn test_api_base_override() {
        let config = AppConfig::from_json(r#"{ "api_base": "http://localhost:3999" }"#).unwrap();
        assert_eq!(config.api_base(), "http://localhost:3999");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "contract_address": " " }"#),
            Err(VaultError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "early_exit_penalty_bps": 20000 }"#),
            Err(VaultError::InvalidPenalty(20_000))
        ));
        assert!(matches!(AppConfig::from_json("not json"), Err(VaultError::Json(_))));
        assert!(matches!(
            AppConfig::from_json(r#"{ "min_deposit": 5000000, "max_deposit": 1000000 }"#),
            Err(VaultError::Config(_))
        ));
    }
}
