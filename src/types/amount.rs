//! Monetary amount validation
//!
//! Amounts are `rust_decimal::Decimal` end to end; string inputs are
//! parsed and scale-checked here at the boundary so business logic never
//! re-parses money. Inputs must be strictly positive with at most two
//! decimal places; accepted amounts are rescaled to exactly two.

use super::error::WalletError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Maximum number of decimal places accepted for a monetary amount
pub const MAX_AMOUNT_SCALE: u32 = 2;

/// Parse a raw amount string into a validated Decimal
///
/// Trims whitespace, parses via `rust_decimal` (which rejects NaN,
/// infinities, and malformed numbers), then applies [`validate_amount`].
///
/// # Errors
///
/// Returns `WalletError::InvalidAmount` if the string does not parse or
/// the parsed value fails validation.
pub fn parse_amount(raw: &str) -> Result<Decimal, WalletError> {
    let trimmed = raw.trim();
    let amount =
        Decimal::from_str(trimmed).map_err(|_| WalletError::invalid_amount(trimmed))?;
    validate_amount(amount)
}

/// Validate an already-parsed amount
///
/// The amount must be strictly positive and carry at most
/// [`MAX_AMOUNT_SCALE`] significant decimal places (trailing zeros are
/// tolerated). The returned value is rescaled to exactly two places.
///
/// # Errors
///
/// Returns `WalletError::InvalidAmount` for zero, negative, or
/// too-precise amounts.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::invalid_amount(&amount.to_string()));
    }

    // Trailing zeros beyond two places are harmless; real sub-cent
    // precision is rejected.
    let normalized = amount.normalize();
    if normalized.scale() > MAX_AMOUNT_SCALE {
        return Err(WalletError::invalid_amount(&amount.to_string()));
    }

    let mut out = normalized;
    out.rescale(MAX_AMOUNT_SCALE);
    Ok(out)
}
