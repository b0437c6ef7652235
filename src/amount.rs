//! STX amount parsing and formatting
//!
//! Amounts never pass through binary floating point. Decimal STX strings are
//! split on the decimal point and scaled to micro-STX with checked integer
//! arithmetic.

use crate::error::{Result, VaultError};

/// Micro-STX per STX
pub const MICRO_PER_STX: u64 = 1_000_000;

/// Fractional digits of one STX
pub const STX_DECIMALS: usize = 6;

/// Parse an integer amount of micro-STX
///
/// Underscore separators are allowed (`100_000000`).
pub fn parse_micro_stx(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    reject_signed_or_non_finite(trimmed)?;

    let digits: String = trimmed.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(VaultError::InvalidAmount(format!(
            "'{}' is not a whole number of micro-STX",
            trimmed
        )));
    }

    digits
        .parse::<u64>()
        .map_err(|_| VaultError::InvalidAmount(format!("'{}' is out of range", trimmed)))
}

/// Parse a decimal STX amount (`12.5`) into micro-STX
///
/// At most six fractional digits are accepted; anything finer than one
/// micro-STX is rejected rather than rounded.
pub fn parse_stx(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    reject_signed_or_non_finite(trimmed)?;

    let (whole_part, frac_part) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole_part.is_empty() && frac_part.is_empty())
        || !all_digits(whole_part)
        || !all_digits(frac_part)
    {
        return Err(VaultError::InvalidAmount(format!("'{}' is not a decimal STX amount", trimmed)));
    }
    if frac_part.len() > STX_DECIMALS {
        return Err(VaultError::InvalidAmount(format!(
            "'{}' has more than {} decimal places",
            trimmed, STX_DECIMALS
        )));
    }

    let out_of_range = || VaultError::InvalidAmount(format!("'{}' is out of range", trimmed));

    let whole: u64 = if whole_part.is_empty() {
        0
    } else {
        whole_part.parse().map_err(|_| out_of_range())?
    };
    let frac: u64 = if frac_part.is_empty() {
        0
    } else {
        format!("{:0<width$}", frac_part, width = STX_DECIMALS)
            .parse()
            .map_err(|_| out_of_range())?
    };

    whole
        .checked_mul(MICRO_PER_STX)
        .and_then(|micro| micro.checked_add(frac))
        .ok_or_else(out_of_range)
}

/// Checked conversion of a signed amount into micro-STX
pub fn micro_from_signed(value: i128) -> Result<u64> {
    if value < 0 {
        return Err(VaultError::InvalidAmount(format!("{} is negative", value)));
    }
    u64::try_from(value).map_err(|_| VaultError::InvalidAmount(format!("{} is out of range", value)))
}

/// Render micro-STX as a decimal STX string with all six places
pub fn format_stx(micro: u64) -> String {
    format!("{}.{:06}", micro / MICRO_PER_STX, micro % MICRO_PER_STX)
}

fn reject_signed_or_non_finite(trimmed: &str) -> Result<()> {
    if trimmed.starts_with('-') {
        return Err(VaultError::InvalidAmount(format!("'{}' is negative", trimmed)));
    }
    let lower = trimmed.trim_start_matches('+').to_ascii_lowercase();
    if lower == "nan" || lower == "inf" || lower == "infinity" {
        return Err(VaultError::InvalidAmount(format!("'{}' is not finite", trimmed)));
    }
    if trimmed.starts_with('+') {
        return Err(VaultError::InvalidAmount(format!("'{}' must not carry a sign", trimmed)));
    }
    Ok(())
}
