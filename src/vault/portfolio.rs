//! Portfolio report over a block of vault positions
//!
//! Quotes every position in parallel and aggregates the results by lock
//! period. TVL is deliberately not part of the report: the contract's
//! `get-tvl` is the only authority for it.

use super::{VaultPosition, VaultStatus, WithdrawalKind};
use crate::error::Result;
use crate::schedule::{LockPeriod, early_exit_value_with_penalty, maturity_for_period};
use rayon::prelude::*;
use serde::Serialize;

/// Per-position output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionRow {
    pub vault_id: u64,
    pub owner: Option<String>,
    pub period: LockPeriod,
    pub annual_rate_bps: u32,
    pub principal: u64,
    pub status: VaultStatus,
    pub unlock_timestamp: i64,
    pub days_remaining: u64,
    pub accrued_yield: u64,
    pub expected_yield: u64,
    pub maturity_value: u64,
    pub early_exit_value: u64,
    pub withdrawal_kind: WithdrawalKind,
    pub withdrawal_payout: u64,
}

impl PositionRow {
    pub fn from_position(position: &VaultPosition, now: i64, penalty_bps: u32) -> Result<Self> {
        let withdrawal = position.withdrawal_quote(now, penalty_bps)?;
        Ok(Self {
            vault_id: position.vault_id,
            owner: position.owner.clone(),
            period: position.period,
            annual_rate_bps: position.period.annual_rate_bps(),
            principal: position.principal,
            status: position.status(now),
            unlock_timestamp: position.unlock_timestamp(),
            days_remaining: position.days_remaining(now),
            accrued_yield: position.accrued_yield(now),
            expected_yield: position.expected_yield(),
            maturity_value: maturity_for_period(position.principal, position.period)?,
            early_exit_value: early_exit_value_with_penalty(position.principal, penalty_bps)?,
            withdrawal_kind: withdrawal.kind,
            withdrawal_payout: withdrawal.payout,
        })
    }
}

/// Aggregated amounts; `u128` so large blocks cannot overflow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioTotals {
    pub positions: usize,
    pub locked: usize,
    pub unlocked: usize,
    pub principal: u128,
    pub expected_yield: u128,
    pub accrued_yield: u128,
    pub maturity_value: u128,
    pub early_exit_value: u128,
    /// Sum of what every position would pay if withdrawn now
    pub withdrawal_payout: u128,
}

impl PortfolioTotals {
    fn add(&mut self, row: &PositionRow) {
        self.positions += 1;
        match row.status {
            VaultStatus::Locked => self.locked += 1,
            VaultStatus::Unlocked => self.unlocked += 1,
        }
        self.principal += row.principal as u128;
        self.expected_yield += row.expected_yield as u128;
        self.accrued_yield += row.accrued_yield as u128;
        self.maturity_value += row.maturity_value as u128;
        self.early_exit_value += row.early_exit_value as u128;
        self.withdrawal_payout += row.withdrawal_payout as u128;
    }
}

/// Totals for one lock period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodBreakdown {
    pub period: LockPeriod,
    pub totals: PortfolioTotals,
}

/// Quotes and aggregates for a set of positions at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    /// Valuation time, unix seconds
    pub as_of: i64,
    pub rows: Vec<PositionRow>,
    pub totals: PortfolioTotals,
    /// One entry per lock period, shortest first, including empty periods
    pub by_period: Vec<PeriodBreakdown>,
}

impl PortfolioReport {
    /// Build the report, quoting positions in parallel
    ///
    /// `penalty_bps` is the early-exit penalty applied to locked positions.
    pub fn build(positions: &[VaultPosition], now: i64, penalty_bps: u32) -> Result<Self> {
        let rows: Vec<PositionRow> = positions
            .par_iter()
            .map(|position| PositionRow::from_position(position, now, penalty_bps))
            .collect::<Result<Vec<_>>>()?;

        let mut totals = PortfolioTotals::default();
        let mut by_period: Vec<PeriodBreakdown> = LockPeriod::ALL
            .iter()
            .map(|&period| PeriodBreakdown { period, totals: PortfolioTotals::default() })
            .collect();

        for row in &rows {
            totals.add(row);
            by_period[row.period as usize].totals.add(row);
        }

        log::info!(
            "Portfolio report: {} positions ({} locked, {} unlocked) as of {}",
            totals.positions,
            totals.locked,
            totals.unlocked,
            now
        );

        Ok(Self { as_of: now, rows, totals, by_period })
    }

    pub fn period(&self, period: LockPeriod) -> &PortfolioTotals {
        &self.by_period[period as usize].totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DEFAULT_EARLY_EXIT_PENALTY_BPS;

    const T0: i64 = 1_703_000_000;

    fn positions() -> Vec<VaultPosition> {
        vec![
            VaultPosition::new(1, 100_000_000, LockPeriod::Days30, T0),
            VaultPosition::new(2, 500_000_000, LockPeriod::Days30, T0),
            VaultPosition::new(3, 100_000_000, LockPeriod::Days365, T0),
        ]
    }

    #[test]
    fn test_report_before_any_unlock() {
        let report = PortfolioReport::build(&positions(), T0 + 86_400, DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.totals.locked, 3);
        assert_eq!(report.totals.principal, 700_000_000);
        // 246575 + 1232876 + 12000000
        assert_eq!(report.totals.expected_yield, 13_479_451);
        // Every position would exit early at 90%
        assert_eq!(report.totals.early_exit_value, 630_000_000);
        assert_eq!(report.totals.withdrawal_payout, 630_000_000);
    }

    #[test]
    fn test_report_after_short_locks_mature() {
        let now = T0 + LockPeriod::Days30.seconds() as i64;
        let report = PortfolioReport::build(&positions(), now, DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();

        assert_eq!(report.totals.unlocked, 2);
        assert_eq!(report.totals.locked, 1);

        let short = report.period(LockPeriod::Days30);
        assert_eq!(short.positions, 2);
        assert_eq!(short.withdrawal_payout, 600_000_000 + 246_575 + 1_232_876);

        let long = report.period(LockPeriod::Days365);
        assert_eq!(long.withdrawal_payout, 90_000_000);

        assert_eq!(report.period(LockPeriod::Days90).positions, 0);
    }

    #[test]
    fn test_rows_keep_input_order() {
        let report = PortfolioReport::build(&positions(), T0, DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();
        let ids: Vec<u64> = report.rows.iter().map(|r| r.vault_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_report() {
        let report = PortfolioReport::build(&[], T0, DEFAULT_EARLY_EXIT_PENALTY_BPS).unwrap();
        assert_eq!(report.totals, PortfolioTotals::default());
        assert_eq!(report.by_period.len(), 4);
    }

    #[test]
    fn test_report_uses_given_penalty() {
        let report = PortfolioReport::build(&positions(), T0, 2_000).unwrap();
        // 80% of 700 STX, all positions still locked
        assert_eq!(report.totals.early_exit_value, 560_000_000);
        assert_eq!(report.totals.withdrawal_payout, 560_000_000);
        assert_eq!(report.rows[0].withdrawal_payout, 80_000_000);
    }
}
