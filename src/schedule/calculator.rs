//! Yield, maturity and early-exit calculations
//!
//! All amounts are integer micro-STX. Products are widened to `u128` and the
//! final division truncates toward zero, so every figure is exact to the
//! smallest currency unit and identical across calls.

use super::period::{LockPeriod, SECONDS_PER_DAY};
use crate::error::{Result, VaultError};
use serde::Serialize;

/// Basis points denominator (100% = 10000 basis points)
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Day count basis for pro-rating annual rates
pub const DAYS_PER_YEAR: u64 = 365;

/// Flat early-exit penalty on principal (10%), as charged by `emergency-withdraw`
pub const DEFAULT_EARLY_EXIT_PENALTY_BPS: u32 = 1_000;

const YIELD_DENOMINATOR: u128 = (DAYS_PER_YEAR * BASIS_POINTS_DENOMINATOR) as u128;
const ACCRUAL_DENOMINATOR: u128 =
    (DAYS_PER_YEAR * SECONDS_PER_DAY * BASIS_POINTS_DENOMINATOR) as u128;

/// Expected yield at maturity for a principal locked for `period_days`
///
/// `principal * rate_bps * days / (365 * 10000)`, simple interest, truncated.
///
/// # Errors
/// `UnknownLockPeriod` if `period_days` is not 30, 90, 180 or 365.
pub fn expected_yield(principal: u64, period_days: u32) -> Result<u64> {
    let period = LockPeriod::from_days(period_days)?;
    Ok(yield_for_period(principal, period))
}

/// Expected yield for an already-resolved lock period
pub fn yield_for_period(principal: u64, period: LockPeriod) -> u64 {
    let numerator =
        principal as u128 * period.annual_rate_bps() as u128 * period.days() as u128;
    // At most 12% of principal, always fits back into u64
    (numerator / YIELD_DENOMINATOR) as u64
}

/// Total payout at maturity: principal plus expected yield
pub fn maturity_value(principal: u64, period_days: u32) -> Result<u64> {
    let period = LockPeriod::from_days(period_days)?;
    maturity_for_period(principal, period)
}

pub fn maturity_for_period(principal: u64, period: LockPeriod) -> Result<u64> {
    principal
        .checked_add(yield_for_period(principal, period))
        .ok_or_else(|| {
            VaultError::InvalidAmount(format!(
                "maturity value of {} micro-STX over {} overflows",
                principal, period
            ))
        })
}

/// Early-exit payout with the default 10% penalty
///
/// Yield is forfeited in full and the penalty is a flat share of principal:
/// neither depends on the lock period or on how much time has elapsed.
pub fn early_exit_value(principal: u64) -> u64 {
    apply_penalty(principal, DEFAULT_EARLY_EXIT_PENALTY_BPS)
}

/// Early-exit payout with an explicit penalty in basis points
///
/// # Errors
/// `InvalidPenalty` if `penalty_bps` exceeds 10000.
pub fn early_exit_value_with_penalty(principal: u64, penalty_bps: u32) -> Result<u64> {
    if penalty_bps as u64 > BASIS_POINTS_DENOMINATOR {
        return Err(VaultError::InvalidPenalty(penalty_bps));
    }
    Ok(apply_penalty(principal, penalty_bps))
}

fn apply_penalty(principal: u64, penalty_bps: u32) -> u64 {
    let kept_bps = BASIS_POINTS_DENOMINATOR - penalty_bps as u64;
    (principal as u128 * kept_bps as u128 / BASIS_POINTS_DENOMINATOR as u128) as u64
}

/// Yield accrued after `elapsed_seconds`, capped at the lock period
///
/// Linear in time. At or past maturity this equals `yield_for_period` exactly.
/// Accrued yield is informational only: an early exit pays none of it.
pub fn accrued_yield(principal: u64, period: LockPeriod, elapsed_seconds: u64) -> u64 {
    let elapsed = elapsed_seconds.min(period.seconds());
    let numerator = principal as u128 * period.annual_rate_bps() as u128 * elapsed as u128;
    (numerator / ACCRUAL_DENOMINATOR) as u64
}

/// All derived figures for one principal and lock period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YieldQuote {
    pub period: LockPeriod,
    pub period_days: u32,
    pub annual_rate_bps: u32,
    pub principal: u64,
    pub expected_yield: u64,
    pub maturity_value: u64,
    pub early_exit_value: u64,
}

impl YieldQuote {
    /// Quote with the default early-exit penalty
    pub fn new(principal: u64, period: LockPeriod) -> Result<Self> {
        Self::with_penalty(principal, period, DEFAULT_EARLY_EXIT_PENALTY_BPS)
    }

    pub fn with_penalty(principal: u64, period: LockPeriod, penalty_bps: u32) -> Result<Self> {
        let expected_yield = yield_for_period(principal, period);
        let quote = Self {
            period,
            period_days: period.days(),
            annual_rate_bps: period.annual_rate_bps(),
            principal,
            expected_yield,
            maturity_value: maturity_for_period(principal, period)?,
            early_exit_value: early_exit_value_with_penalty(principal, penalty_bps)?,
        };
        log::debug!(
            "Quoted {} micro-STX over {}: yield={} maturity={} early_exit={}",
            principal,
            period,
            quote.expected_yield,
            quote.maturity_value,
            quote.early_exit_value
        );
        Ok(quote)
    }

    /// Principal lost to the penalty on early exit
    pub fn penalty_amount(&self) -> u64 {
        self.principal - self.early_exit_value
    }

    /// Total given up by exiting early instead of waiting for maturity
    pub fn early_exit_cost(&self) -> u64 {
        self.maturity_value - self.early_exit_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUNDRED_STX: u64 = 100_000_000;

    #[test]
    fn test_expected_yield_reference_values() {
        // 100 STX at 3% for 30 days: 246575.34 truncated
        assert_eq!(expected_yield(HUNDRED_STX, 30).unwrap(), 246_575);
        // 100 STX at 12% for a full year: exactly 12 STX
        assert_eq!(expected_yield(HUNDRED_STX, 365).unwrap(), 12_000_000);
        // 100 STX at 5% for 90 days: 1232876.71
        assert_eq!(expected_yield(HUNDRED_STX, 90).unwrap(), 1_232_876);
        // 100 STX at 8% for 180 days: 3945205.47
        assert_eq!(expected_yield(HUNDRED_STX, 180).unwrap(), 3_945_205);
    }

    #[test]
    fn test_zero_principal() {
        for period in LockPeriod::ALL {
            assert_eq!(expected_yield(0, period.days()).unwrap(), 0);
            assert_eq!(maturity_value(0, period.days()).unwrap(), 0);
        }
        assert_eq!(early_exit_value(0), 0);
    }

    #[test]
    fn test_truncates_toward_zero() {
        // 1 micro-STX never earns a whole unit
        for period in LockPeriod::ALL {
            assert_eq!(yield_for_period(1, period), 0);
        }
        // 12166 * 300 * 30 / 3650000 = 29.998...
        assert_eq!(expected_yield(12_166, 30).unwrap(), 29);
    }

    #[test]
    fn test_unknown_period() {
        assert!(matches!(expected_yield(HUNDRED_STX, 60), Err(VaultError::UnknownLockPeriod(_))));
        assert!(matches!(maturity_value(HUNDRED_STX, 0), Err(VaultError::UnknownLockPeriod(_))));
    }

    #[test]
    fn test_maturity_is_principal_plus_yield() {
        for principal in [0, 1, 999, 1_000_000, HUNDRED_STX, 123_456_789_012] {
            for period in LockPeriod::ALL {
                let days = period.days();
                assert_eq!(
                    maturity_value(principal, days).unwrap(),
                    principal + expected_yield(principal, days).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_maturity_overflow() {
        let result = maturity_for_period(u64::MAX, LockPeriod::Days365);
        assert!(matches!(result, Err(VaultError::InvalidAmount(_))));
        // Yield itself never overflows
        assert_eq!(
            yield_for_period(u64::MAX, LockPeriod::Days365),
            (u64::MAX as u128 * 12 / 100) as u64
        );
    }

    #[test]
    fn test_early_exit_default_penalty() {
        assert_eq!(early_exit_value(HUNDRED_STX), 90_000_000);
        for principal in [0u64, 10, 999, 1_000_001, 7_777_777_777] {
            assert_eq!(early_exit_value(principal), principal * 9 / 10);
        }
    }

    #[test]
    fn test_early_exit_ignores_period() {
        // Same payout whichever period was chosen: the penalty is on principal only
        let payouts: Vec<u64> = LockPeriod::ALL
            .iter()
            .map(|&p| YieldQuote::new(HUNDRED_STX, p).unwrap().early_exit_value)
            .collect();
        assert!(payouts.iter().all(|&v| v == 90_000_000));
    }

    #[test]
    fn test_custom_penalty() {
        assert_eq!(early_exit_value_with_penalty(HUNDRED_STX, 0).unwrap(), HUNDRED_STX);
        assert_eq!(early_exit_value_with_penalty(HUNDRED_STX, 2_500).unwrap(), 75_000_000);
        assert_eq!(early_exit_value_with_penalty(HUNDRED_STX, 10_000).unwrap(), 0);
        assert!(matches!(
            early_exit_value_with_penalty(HUNDRED_STX, 10_001),
            Err(VaultError::InvalidPenalty(10_001))
        ));
    }

    #[test]
    fn test_accrual_reaches_expected_yield() {
        for period in LockPeriod::ALL {
            let full = yield_for_period(HUNDRED_STX, period);
            assert_eq!(accrued_yield(HUNDRED_STX, period, 0), 0);
            assert_eq!(accrued_yield(HUNDRED_STX, period, period.seconds()), full);
            // Capped after maturity
            assert_eq!(accrued_yield(HUNDRED_STX, period, period.seconds() * 3), full);
        }

        // Halfway through a 30-day lock
        let half = accrued_yield(HUNDRED_STX, LockPeriod::Days30, 15 * SECONDS_PER_DAY);
        assert_eq!(half, 123_287);
    }

    #[test]
    fn test_idempotent() {
        let first = expected_yield(HUNDRED_STX, 180).unwrap();
        let second = expected_yield(HUNDRED_STX, 180).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            YieldQuote::new(HUNDRED_STX, LockPeriod::Days180).unwrap(),
            YieldQuote::new(HUNDRED_STX, LockPeriod::Days180).unwrap()
        );
    }

    #[test]
    fn test_quote_fields() {
        let quote = YieldQuote::new(HUNDRED_STX, LockPeriod::Days30).unwrap();
        assert_eq!(quote.annual_rate_bps, 300);
        assert_eq!(quote.period_days, 30);
        assert_eq!(quote.expected_yield, 246_575);
        assert_eq!(quote.maturity_value, 100_246_575);
        assert_eq!(quote.early_exit_value, 90_000_000);
        assert_eq!(quote.penalty_amount(), 10_000_000);
        assert_eq!(quote.early_exit_cost(), 10_246_575);
    }
}
