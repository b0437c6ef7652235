//! State-changing contract calls
//!
//! Payloads are shaped for a wallet to sign; the nonce is left empty for the
//! wallet to fill from the account state.

use crate::config::AppConfig;
use crate::error::{Result, VaultError};
use crate::schedule::{LockPeriod, YieldQuote};
use serde::Serialize;

/// Public entry points of the vault contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractFunction {
    #[serde(rename = "create-pool")]
    CreatePool,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "withdraw")]
    Withdraw,
    #[serde(rename = "emergency-withdraw")]
    EmergencyWithdraw,
}

impl ContractFunction {
    pub fn name(&self) -> &'static str {
        match self {
            ContractFunction::CreatePool => "create-pool",
            ContractFunction::Deposit => "deposit",
            ContractFunction::Withdraw => "withdraw",
            ContractFunction::EmergencyWithdraw => "emergency-withdraw",
        }
    }
}

/// Named arguments for each entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FunctionArgs {
    CreatePool {
        name: String,
        /// micro-STX
        #[serde(rename = "minDeposit")]
        min_deposit: u64,
        /// micro-STX
        #[serde(rename = "maxDeposit")]
        max_deposit: u64,
    },
    Deposit {
        /// micro-STX
        amount: u64,
        /// Lock length in seconds
        #[serde(rename = "lockPeriod")]
        lock_period: u64,
        #[serde(rename = "poolId")]
        pool_id: u64,
    },
    Vault {
        #[serde(rename = "vaultId")]
        vault_id: u64,
    },
}

/// Unsigned transaction for a wallet to sign and broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub contract_address: String,
    pub contract_name: String,
    pub function_name: ContractFunction,
    pub function_args: FunctionArgs,
    pub network: String,
    /// micro-STX
    pub fee: u64,
    pub nonce: Option<u64>,
    pub post_conditions: Vec<String>,
}

impl TransactionPayload {
    fn new(config: &AppConfig, function: ContractFunction, args: FunctionArgs) -> Self {
        Self {
            contract_address: config.contract_address.clone(),
            contract_name: config.contract_name.clone(),
            function_name: function,
            function_args: args,
            network: config.network.to_string(),
            fee: config.fee,
            nonce: None,
            post_conditions: Vec::new(),
        }
    }

    /// Pool creation payload (admin only on the contract side)
    pub fn create_pool(config: &AppConfig, pool: &PoolLimits) -> Result<Self> {
        pool.validate()?;
        log::info!(
            "Create pool '{}' accepting {}..={} micro-STX",
            pool.name,
            pool.min_deposit,
            pool.max_deposit
        );
        Ok(Self::new(
            config,
            ContractFunction::CreatePool,
            FunctionArgs::CreatePool {
                name: pool.name.clone(),
                min_deposit: pool.min_deposit,
                max_deposit: pool.max_deposit,
            },
        ))
    }

    /// Deposit payload; the request is validated against the configured limits
    pub fn deposit(config: &AppConfig, request: &DepositRequest) -> Result<Self> {
        request.validate(config.min_deposit, config.max_deposit)?;
        log::info!(
            "Deposit of {} micro-STX for {} into pool {}",
            request.amount,
            request.period,
            request.pool_id
        );
        Ok(Self::new(
            config,
            ContractFunction::Deposit,
            FunctionArgs::Deposit {
                amount: request.amount,
                lock_period: request.period.seconds(),
                pool_id: request.pool_id,
            },
        ))
    }

    pub fn withdraw(config: &AppConfig, vault_id: u64) -> Self {
        Self::new(config, ContractFunction::Withdraw, FunctionArgs::Vault { vault_id })
    }

    pub fn emergency_withdraw(config: &AppConfig, vault_id: u64) -> Self {
        log::warn!(
            "Emergency withdraw of vault {} forfeits all yield and pays a principal penalty",
            vault_id
        );
        Self::new(config, ContractFunction::EmergencyWithdraw, FunctionArgs::Vault { vault_id })
    }
}

/// A deposit the user intends to submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepositRequest {
    /// micro-STX
    pub amount: u64,
    pub period: LockPeriod,
    pub pool_id: u64,
}

impl DepositRequest {
    pub fn new(amount: u64, period: LockPeriod, pool_id: u64) -> Self {
        Self { amount, period, pool_id }
    }

    /// Reject deposits that the contract would refuse, before paying a fee
    pub fn validate(&self, min_deposit: u64, max_deposit: Option<u64>) -> Result<()> {
        if self.amount == 0 {
            return Err(VaultError::InvalidAmount("deposit amount is zero".into()));
        }
        if self.amount < min_deposit {
            return Err(VaultError::BelowMinimumDeposit {
                amount: self.amount,
                minimum: min_deposit,
            });
        }
        if let Some(maximum) = max_deposit.filter(|&max| self.amount > max) {
            return Err(VaultError::AboveMaximumDeposit { amount: self.amount, maximum });
        }
        Ok(())
    }

    /// Figures the depositor can expect from this request
    pub fn quote(&self) -> Result<YieldQuote> {
        YieldQuote::new(self.amount, self.period)
    }
}

/// Deposit bounds of a yield pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolLimits {
    pub name: String,
    /// micro-STX
    pub min_deposit: u64,
    /// micro-STX
    pub max_deposit: u64,
}

impl PoolLimits {
    pub fn new(name: impl Into<String>, min_deposit: u64, max_deposit: u64) -> Self {
        Self { name: name.into(), min_deposit, max_deposit }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VaultError::Config("pool name is empty".into()));
        }
        if self.max_deposit < self.min_deposit {
            return Err(VaultError::InvalidAmount(format!(
                "pool maximum {} is below minimum {}",
                self.max_deposit, self.min_deposit
            )));
        }
        Ok(())
    }

    /// Check a deposit against this pool
    pub fn check(&self, request: &DepositRequest) -> Result<()> {
        request.validate(self.min_deposit, Some(self.max_deposit))
    }
}
