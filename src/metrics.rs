//! Activity metrics from contract-call events
//!
//! `MetricsStore` is an ordinary value owned by whoever processes events.
//! It never computes TVL: the figure it reports is whatever was last read
//! from the contract's `get-tvl`.

use crate::amount::{micro_from_signed, parse_micro_stx};
use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Webhook event as delivered by the chain event hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    #[serde(default)]
    pub contract_call: Option<ContractCallEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCallEvent {
    pub method: String,
    pub sender: String,
    /// micro-STX
    #[serde(default)]
    pub fee: Option<EventValue>,
    #[serde(default)]
    pub args: EventArgs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArgs {
    /// micro-STX
    #[serde(default)]
    pub amount: Option<EventValue>,
}

/// Numeric event field; the hook sends these either as numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    Number(i64),
    Text(String),
}

impl EventValue {
    /// Value in micro-STX; an empty string counts as zero
    pub fn micro_stx(&self) -> Result<u64> {
        match self {
            EventValue::Number(n) => micro_from_signed(*n as i128),
            EventValue::Text(text) if text.trim().is_empty() => Ok(0),
            EventValue::Text(text) => parse_micro_stx(text),
        }
    }
}

fn micro_or_zero(value: Option<&EventValue>) -> Result<u64> {
    value.map(EventValue::micro_stx).transpose().map(|v| v.unwrap_or(0))
}

impl ContractEvent {
    pub fn call(method: &str, sender: &str, fee: i64, amount: Option<i64>) -> Self {
        Self {
            contract_call: Some(ContractCallEvent {
                method: method.to_string(),
                sender: sender.to_string(),
                fee: Some(EventValue::Number(fee)),
                args: EventArgs { amount: amount.map(EventValue::Number) },
            }),
        }
    }
}

/// Load a JSON array of events
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<ContractEvent>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let events: Vec<ContractEvent> = serde_json::from_str(&text)?;
    log::debug!("Loaded {} events from {}", events.len(), path.as_ref().display());
    Ok(events)
}

/// A deposit or withdrawal seen in the event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowRecord {
    pub sender: String,
    pub amount: u64,
}

/// Counters and flows accumulated from events
#[derive(Debug, Default)]
pub struct MetricsStore {
    unique_users: HashSet<String>,
    daily_active_users: HashSet<String>,
    transactions: u64,
    fees: u64,
    deposits: Vec<FlowRecord>,
    withdrawals: Vec<FlowRecord>,
    emergency_withdrawals: u64,
    pools_created: u64,
    observed_tvl: Option<u64>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event; events without a contract call are ignored
    ///
    /// The event is validated before any counter changes, so a rejected
    /// event leaves the store untouched.
    pub fn record(&mut self, event: &ContractEvent) -> Result<()> {
        let Some(call) = &event.contract_call else {
            log::debug!("Skipping event without contract call");
            return Ok(());
        };

        let fee = micro_or_zero(call.fee.as_ref())?;
        let amount = micro_or_zero(call.args.amount.as_ref())?;
        let fees = self.fees.checked_add(fee).ok_or_else(|| {
            VaultError::InvalidAmount(format!(
                "fee total {} + {} micro-STX overflows",
                self.fees, fee
            ))
        })?;

        self.transactions += 1;
        self.fees = fees;
        self.unique_users.insert(call.sender.clone());
        self.daily_active_users.insert(call.sender.clone());

        match call.method.as_str() {
            "deposit" => {
                self.deposits.push(FlowRecord { sender: call.sender.clone(), amount });
                log::info!("Deposit: {} micro-STX from {}", amount, call.sender);
            }
            "withdraw" => {
                self.withdrawals.push(FlowRecord { sender: call.sender.clone(), amount });
                log::info!("Withdrawal: {} micro-STX to {}", amount, call.sender);
            }
            "emergency-withdraw" => {
                self.emergency_withdrawals += 1;
                log::info!("Emergency withdrawal by {}", call.sender);
            }
            "create-pool" => {
                self.pools_created += 1;
                log::info!("Pool created by {}", call.sender);
            }
            other => log::debug!("Counted call to {} by {}", other, call.sender),
        }
        Ok(())
    }

    /// Apply events in order, stopping at the first invalid one
    pub fn record_all<'a, I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ContractEvent>,
    {
        for event in events {
            self.record(event)?;
        }
        Ok(())
    }

    /// Store the TVL as read from the contract
    pub fn set_observed_tvl(&mut self, tvl: u64) {
        self.observed_tvl = Some(tvl);
    }

    /// Start a new day: only the daily-active set is cleared
    pub fn reset_daily(&mut self) {
        self.daily_active_users.clear();
        log::info!("Daily metrics reset");
    }

    /// Clear everything, including the observed TVL
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            unique_users: self.unique_users.len(),
            daily_active_users: self.daily_active_users.len(),
            transactions: self.transactions,
            fees: self.fees,
            deposits: self.deposits.len(),
            deposit_volume: self.deposits.iter().map(|d| d.amount as u128).sum(),
            withdrawals: self.withdrawals.len(),
            withdrawal_volume: self.withdrawals.iter().map(|w| w.amount as u128).sum(),
            emergency_withdrawals: self.emergency_withdrawals,
            pools_created: self.pools_created,
            observed_tvl: self.observed_tvl,
        }
    }

    pub fn deposits(&self) -> &[FlowRecord] {
        &self.deposits
    }

    pub fn withdrawals(&self) -> &[FlowRecord] {
        &self.withdrawals
    }
}

/// Point-in-time view of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub unique_users: usize,
    pub daily_active_users: usize,
    pub transactions: u64,
    /// micro-STX
    pub fees: u64,
    pub deposits: usize,
    pub deposit_volume: u128,
    pub withdrawals: usize,
    pub withdrawal_volume: u128,
    pub emergency_withdrawals: u64,
    pub pools_created: u64,
    /// Last `get-tvl` reading, if any
    pub observed_tvl: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_events() -> Vec<ContractEvent> {
        vec![
            ContractEvent::call("deposit", "ST1DEMO", 10_000, Some(100_000_000)),
            ContractEvent::call("deposit", "ST2DEMO", 10_000, Some(500_000_000)),
            ContractEvent::call("withdraw", "ST1DEMO", 10_000, Some(105_000_000)),
        ]
    }

    #[test]
    fn test_record_demo_events() {
        let mut store = MetricsStore::new();
        store.record_all(&demo_events()).unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.unique_users, 2);
        assert_eq!(snap.daily_active_users, 2);
        assert_eq!(snap.transactions, 3);
        assert_eq!(snap.fees, 30_000);
        assert_eq!(snap.deposits, 2);
        assert_eq!(snap.deposit_volume, 600_000_000);
        assert_eq!(snap.withdrawal_volume, 105_000_000);
        assert_eq!(snap.observed_tvl, None);
    }

    #[test]
    fn test_tvl_is_only_observed() {
        let mut store = MetricsStore::new();
        store.record_all(&demo_events()).unwrap();
        assert!(store.snapshot().observed_tvl.is_none());

        store.set_observed_tvl(495_000_000);
        assert_eq!(store.snapshot().observed_tvl, Some(495_000_000));
    }

    #[test]
    fn test_reset_semantics() {
        let mut store = MetricsStore::new();
        store.record_all(&demo_events()).unwrap();
        store.set_observed_tvl(1);

        store.reset_daily();
        let snap = store.snapshot();
        assert_eq!(snap.daily_active_users, 0);
        assert_eq!(snap.unique_users, 2);
        assert_eq!(snap.transactions, 3);

        store.reset();
        let snap = store.snapshot();
        assert_eq!(snap.unique_users, 0);
        assert_eq!(snap.transactions, 0);
        assert_eq!(snap.observed_tvl, None);
    }

    #[test]
    fn test_negative_amount_rejected_without_side_effects() {
        let mut store = MetricsStore::new();
        let bad = ContractEvent::call("deposit", "ST1DEMO", 10_000, Some(-5));
        assert!(matches!(store.record(&bad), Err(VaultError::InvalidAmount(_))));
        assert_eq!(store.snapshot().transactions, 0);
        assert!(store.deposits().is_empty());
    }

    #[test]
    fn test_parse_webhook_json() {
        let json = r#"[
            {"contract_call": {"method": "deposit", "sender": "ST1", "fee": 10000, "args": {"amount": 100000000}}},
            {"contract_call": {"method": "emergency-withdraw", "sender": "ST1"}},
            {"block": 3701326}
        ]"#;
        let events: Vec<ContractEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[2].contract_call.is_none());

        let mut store = MetricsStore::new();
        store.record_all(&events).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.transactions, 2);
        assert_eq!(snap.emergency_withdrawals, 1);
        assert_eq!(snap.fees, 10_000);
    }

    #[test]
    fn test_string_fields_accepted() {
        let json = r#"[
            {"contract_call": {"method": "deposit", "sender": "ST1", "fee": "10000", "args": {"amount": "100000000"}}},
            {"contract_call": {"method": "withdraw", "sender": "ST1", "fee": "", "args": {"amount": 40000000}}}
        ]"#;
        let events: Vec<ContractEvent> = serde_json::from_str(json).unwrap();

        let mut store = MetricsStore::new();
        store.record_all(&events).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.fees, 10_000);
        assert_eq!(snap.deposit_volume, 100_000_000);
        assert_eq!(snap.withdrawal_volume, 40_000_000);
    }

    #[test]
    fn test_malformed_string_amount_rejected() {
        let json = r#"{"contract_call": {"method": "deposit", "sender": "ST1", "fee": "-1"}}"#;
        let event: ContractEvent = serde_json::from_str(json).unwrap();

        let mut store = MetricsStore::new();
        assert!(matches!(store.record(&event), Err(VaultError::InvalidAmount(_))));
        assert_eq!(store.snapshot().transactions, 0);
    }

    #[test]
    fn test_fee_overflow_is_an_error() {
        let mut store = MetricsStore::new();
        store.record(&ContractEvent::call("deposit", "ST1", i64::MAX, None)).unwrap();
        store.record(&ContractEvent::call("deposit", "ST1", i64::MAX, None)).unwrap();
        assert_eq!(store.snapshot().fees, i64::MAX as u64 * 2);

        // u64::MAX - 1 so far; a fee of 2 overflows
        let result = store.record(&ContractEvent::call("deposit", "ST2", 2, None));
        assert!(matches!(result, Err(VaultError::InvalidAmount(_))));

        let snap = store.snapshot();
        assert_eq!(snap.transactions, 2);
        assert_eq!(snap.fees, u64::MAX - 1);
        assert_eq!(snap.unique_users, 1);
    }
}
