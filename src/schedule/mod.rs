//! Yield schedule: the lock period table and the calculations built on it

mod period;
mod calculator;

pub use period::{
    LockPeriod, LockPeriodOption, LOCK_PERIOD_TABLE, SECONDS_PER_DAY,
    rate_for_period, rate_for_seconds,
};
pub use calculator::{
    YieldQuote, BASIS_POINTS_DENOMINATOR, DAYS_PER_YEAR, DEFAULT_EARLY_EXIT_PENALTY_BPS,
    expected_yield, yield_for_period, maturity_value, maturity_for_period,
    early_exit_value, early_exit_value_with_penalty, accrued_yield,
};
