//! Vault positions and what a holder would receive from them

use crate::error::Result;
use crate::schedule::{
    LockPeriod, SECONDS_PER_DAY, accrued_yield, early_exit_value_with_penalty,
    maturity_for_period, yield_for_period,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lock status of a vault at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultStatus {
    /// Lock period still running; only an early exit is possible
    Locked,
    /// Lock period over; principal and yield can be withdrawn
    Unlocked,
}

/// A time-locked deposit as tracked by the vault contract
///
/// Positions are read-only here: figures are derived, never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPosition {
    /// Contract vault identifier
    pub vault_id: u64,

    /// Owner principal, when known
    pub owner: Option<String>,

    /// Deposited amount in micro-STX
    pub principal: u64,

    /// Chosen lock period
    pub period: LockPeriod,

    /// Deposit time, unix seconds
    pub deposit_timestamp: i64,
}

impl VaultPosition {
    pub fn new(vault_id: u64, principal: u64, period: LockPeriod, deposit_timestamp: i64) -> Self {
        Self {
            vault_id,
            owner: None,
            principal,
            period,
            deposit_timestamp,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// `deposit_timestamp + period seconds`
    pub fn unlock_timestamp(&self) -> i64 {
        self.deposit_timestamp
            .saturating_add(self.period.seconds() as i64)
    }

    pub fn unlock_date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.unlock_timestamp(), 0)
    }

    pub fn is_unlocked(&self, now: i64) -> bool {
        now >= self.unlock_timestamp()
    }

    pub fn status(&self, now: i64) -> VaultStatus {
        if self.is_unlocked(now) {
            VaultStatus::Unlocked
        } else {
            VaultStatus::Locked
        }
    }

    /// Whole days left until unlock, rounded up; zero once unlocked
    pub fn days_remaining(&self, now: i64) -> u64 {
        let remaining = self.unlock_timestamp().saturating_sub(now);
        if remaining <= 0 {
            0
        } else {
            (remaining as u64).div_ceil(SECONDS_PER_DAY)
        }
    }

    /// Yield at maturity
    pub fn expected_yield(&self) -> u64 {
        yield_for_period(self.principal, self.period)
    }

    /// Yield earned so far, for display
    pub fn accrued_yield(&self, now: i64) -> u64 {
        let elapsed = now.saturating_sub(self.deposit_timestamp).max(0) as u64;
        accrued_yield(self.principal, self.period, elapsed)
    }

    /// What withdrawing at `now` would pay out
    ///
    /// `penalty_bps` only applies before unlock; pass
    /// `DEFAULT_EARLY_EXIT_PENALTY_BPS` for the contract's 10%.
    pub fn withdrawal_quote(&self, now: i64, penalty_bps: u32) -> Result<WithdrawalQuote> {
        let expected_yield = self.expected_yield();

        let quote = if self.is_unlocked(now) {
            WithdrawalQuote {
                vault_id: self.vault_id,
                kind: WithdrawalKind::Matured,
                principal: self.principal,
                payout: maturity_for_period(self.principal, self.period)?,
                penalty: 0,
                forfeited_yield: 0,
            }
        } else {
            let payout = early_exit_value_with_penalty(self.principal, penalty_bps)?;
            WithdrawalQuote {
                vault_id: self.vault_id,
                kind: WithdrawalKind::EarlyExit,
                principal: self.principal,
                payout,
                penalty: self.principal - payout,
                forfeited_yield: expected_yield,
            }
        };
        Ok(quote)
    }
}

/// Which withdrawal path applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalKind {
    /// `withdraw` after the lock period: principal plus full yield
    Matured,
    /// `emergency-withdraw` before unlock: principal less penalty, no yield
    EarlyExit,
}

/// Payout breakdown for a withdrawal at a given time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalQuote {
    pub vault_id: u64,
    pub kind: WithdrawalKind,
    pub principal: u64,
    pub payout: u64,
    /// Principal withheld as penalty
    pub penalty: u64,
    /// Expected yield given up
    pub forfeited_yield: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use crate::schedule::{DEFAULT_EARLY_EXIT_PENALTY_BPS, YieldQuote};

    const DEPOSIT_TIME: i64 = 1_703_000_000;

    fn position(period: LockPeriod) -> VaultPosition {
        VaultPosition::new(1, 100_000_000, period, DEPOSIT_TIME)
    }

    #[test]
    fn test_unlock_timing() {
        let pos = position(LockPeriod::Days30);
        assert_eq!(pos.unlock_timestamp(), DEPOSIT_TIME + 2_592_000);

        assert_eq!(pos.status(DEPOSIT_TIME), VaultStatus::Locked);
        assert_eq!(pos.status(pos.unlock_timestamp() - 1), VaultStatus::Locked);
        assert_eq!(pos.status(pos.unlock_timestamp()), VaultStatus::Unlocked);
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let pos = position(LockPeriod::Days90);
        assert_eq!(pos.days_remaining(DEPOSIT_TIME), 90);
        // One second in, still 90 started days to go
        assert_eq!(pos.days_remaining(DEPOSIT_TIME + 1), 90);
        assert_eq!(pos.days_remaining(pos.unlock_timestamp() - 1), 1);
        assert_eq!(pos.days_remaining(pos.unlock_timestamp()), 0);
        assert_eq!(pos.days_remaining(pos.unlock_timestamp() + 86_400 * 10), 0);
    }

    #[test]
    fn test_unlock_date() {
        let pos = VaultPosition::new(7, 1, LockPeriod::Days365, 0);
        let date = pos.unlock_date().unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "1971-01-01");
    }

    #[test]
    fn test_matured_withdrawal() {
        let pos = position(LockPeriod::Days365);
        let quote = pos.withdrawal_quote(pos.unlock_timestamp(), DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();
        assert_eq!(quote.kind, WithdrawalKind::Matured);
        assert_eq!(quote.payout, 112_000_000);
        assert_eq!(quote.penalty, 0);
        assert_eq!(quote.forfeited_yield, 0);
    }

    #[test]
    fn test_early_exit_forfeits_all_yield() {
        // Payout is the same one second after deposit and one second before unlock
        let pos = position(LockPeriod::Days180);
        let early = pos.withdrawal_quote(DEPOSIT_TIME + 1, DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();
        let late = pos.withdrawal_quote(pos.unlock_timestamp() - 1, DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();

        for quote in [&early, &late] {
            assert_eq!(quote.kind, WithdrawalKind::EarlyExit);
            assert_eq!(quote.payout, 90_000_000);
            assert_eq!(quote.penalty, 10_000_000);
            assert_eq!(quote.forfeited_yield, 3_945_205);
        }
    }

    #[test]
    fn test_accrued_yield() {
        let pos = position(LockPeriod::Days30);
        assert_eq!(pos.accrued_yield(DEPOSIT_TIME - 100), 0);
        assert_eq!(pos.accrued_yield(DEPOSIT_TIME), 0);
        assert_eq!(pos.accrued_yield(pos.unlock_timestamp()), 246_575);
        assert_eq!(pos.accrued_yield(pos.unlock_timestamp() + 1_000_000), 246_575);
    }

    #[test]
    fn test_custom_penalty_matches_quote() {
        let pos = position(LockPeriod::Days30);
        let quote = YieldQuote::with_penalty(pos.principal, pos.period, 2_000).unwrap();
        let early = pos.withdrawal_quote(DEPOSIT_TIME + 1, 2_000).unwrap();

        assert_eq!(early.payout, 80_000_000);
        assert_eq!(early.payout, quote.early_exit_value);
        assert_eq!(early.penalty, quote.penalty_amount());

        // Penalty never touches a matured withdrawal
        let matured = pos.withdrawal_quote(pos.unlock_timestamp(), 2_000).unwrap();
        assert_eq!(matured.payout, 100_246_575);
        assert_eq!(matured.penalty, 0);
    }

    #[test]
    fn test_invalid_penalty_rejected() {
        let pos = position(LockPeriod::Days90);
        assert!(matches!(
            pos.withdrawal_quote(DEPOSIT_TIME, 10_001),
            Err(VaultError::InvalidPenalty(10_001))
        ));
    }
}
