//! Request builders for the `yield-vault` contract
//!
//! Requests are built and printed, never sent: signing and broadcasting are
//! left to a wallet.

mod call;
mod transaction;

pub use call::{ReadOnlyBody, ReadOnlyCall, ReadOnlyFunction, encode_principal, encode_uint};
pub use transaction::{
    ContractFunction, DepositRequest, FunctionArgs, PoolLimits, TransactionPayload,
};

use crate::error::VaultError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stacks network the contract is deployed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub fn api_base(&self) -> &'static str {
        match self {
            Network::Testnet => "https://api.testnet.hiro.so",
            Network::Mainnet => "https://api.hiro.so",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(VaultError::Config(format!("unknown network '{}'", other))),
        }
    }
}
