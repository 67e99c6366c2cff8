//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! All prices and quantities in lobcore use fixed-point representation to
//! avoid floating-point errors on the hot path. Prices are stored as `u64`
//! scaled by 10^2, so one tick is 1/100 of a currency unit (one cent).
//!
//! ## Why Fixed-Point?
//!
//! Floating-point arithmetic can produce different results on different
//! hardware, breaking determinism. Fixed-point ensures identical results
//! everywhere, and integer comparisons keep the matching loop branch-cheap.
//!
//! ## Sentinel
//!
//! Price `0` doubles as [`INVALID_PRICE`]: queries against an empty side
//! return it, and a limit order at price 0 is legal but never crossable.
//!
//! ## Examples
//!
//! ```
//! use lobcore::types::price::{to_fixed, from_fixed};
//!
//! // Convert 100.50 to fixed-point
//! let price = to_fixed("100.50").unwrap();
//! assert_eq!(price, 10_050);
//!
//! // Convert back to string
//! assert_eq!(from_fixed(price), "100.50");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Fixed-point price in ticks (1 tick = 0.01 currency units).
pub type Price = u64;

/// Order quantity in whole units.
pub type Quantity = u64;

/// Unique, monotonically increasing order identifier. Never zero for an
/// issued order.
pub type OrderId = u64;

/// Scaling factor for fixed-point prices: 10^2, two decimal places.
pub const SCALE: u64 = 100;

/// Sentinel returned by price queries when no price exists.
pub const INVALID_PRICE: Price = 0;

/// Largest representable price.
pub const MAX_PRICE: Price = u64::MAX;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to a fixed-point price.
///
/// Returns `None` if parsing fails, the value is negative, or it is out of
/// range.
///
/// # Example
///
/// ```
/// use lobcore::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100));
/// assert_eq!(to_fixed("100.50"), Some(10_050));
/// assert_eq!(to_fixed("0.01"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<Price> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a `Decimal` to a fixed-point price, rounding to the nearest tick.
///
/// Returns `None` if the value is negative or out of range.
pub fn decimal_to_fixed(d: Decimal) -> Option<Price> {
    if d.is_sign_negative() {
        return None;
    }
    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert a fixed-point price to a `Decimal`.
pub fn fixed_to_decimal(value: Price) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert a fixed-point price to a string with two decimal places.
///
/// # Example
///
/// ```
/// use lobcore::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100), "1.00");
/// assert_eq!(from_fixed(10_050), "100.50");
/// ```
pub fn from_fixed(value: Price) -> String {
    format!("{:.2}", fixed_to_decimal(value))
}

// ============================================================================
// Floating-Point Convenience (not for the hot path)
// ============================================================================

/// Convert a floating-point price to fixed-point, rounding half up.
///
/// Convenience for demos and tests. Never used inside the matching loop.
///
/// # Example
///
/// ```
/// use lobcore::types::price::from_f64;
///
/// assert_eq!(from_f64(100.50), 10_050);
/// assert_eq!(from_f64(99.999), 10_000);
/// ```
pub fn from_f64(p: f64) -> Price {
    (p * SCALE as f64 + 0.5) as Price
}

/// Convert a fixed-point price back to floating point.
pub fn to_f64(p: Price) -> f64 {
    p as f64 / SCALE as f64
}

// ============================================================================
// Unit Tests
// ============================================================================
