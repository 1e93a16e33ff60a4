//! # Token Units
//!
//! Balances are unsigned integers on an 18-decimal fixed-point scale.

use crate::entities::U256;

/// Decimal places of the token.
pub const DECIMALS: u8 = 18;

/// Base units in one whole token (10^18).
pub fn one_token() -> U256 {
    U256::exp10(DECIMALS as usize)
}

/// Converts a whole-token count into base units.
pub fn tokens(whole: u64) -> U256 {
    U256::from(whole) * one_token()
}

/// `floor(amount * numerator / denominator)` without intermediate overflow.
///
/// Splits `amount = q * denominator + r` so that only `r * numerator` is
/// multiplied, which stays far below `U256::MAX` for small ratios.
///
/// # Panics
///
/// Panics if `denominator` is zero or `numerator > denominator`.
pub fn proportion(amount: U256, numerator: u64, denominator: u64) -> U256 {
    assert!(denominator != 0 && numerator <= denominator);
    let d = U256::from(denominator);
    let n = U256::from(numerator);
    let q = amount / d;
    let r = amount % d;
    q * n + (r * n) / d
}
