//! Fixed-point price and quantity utilities.
//!
//! ## Overview
//!
//! All prices and quantities in the book are u64 values scaled by 10^8.
//! The price map and the priority heap both key on the raw u64, so the
//! same value always hashes and orders identically - the reason a scaled
//! integer is used instead of the floating-point representation some
//! feeds deliver.
//!
//! ## Scale Factor
//!
//! 10^8 (100,000,000) gives 8 decimal places, enough for equity ticks
//! and most crypto pairs.
//!
//! ## Examples
//!
//! ```
//! use lobcore::types::price::{to_fixed, from_fixed};
//!
//! let price = to_fixed("50000.12345678").unwrap();
//! assert_eq!(price, 5_000_012_345_678);
//! assert_eq!(from_fixed(price), "50000.12345678");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point arithmetic: 10^8
pub const SCALE: u64 = 100_000_000;

/// Maximum value that can be safely represented
///
/// u64::MAX / SCALE ≈ 184,467,440,737 (184 billion)
pub const MAX_VALUE: u64 = u64::MAX / SCALE;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// # Returns
///
/// * `Some(u64)` - The fixed-point representation
/// * `None` - If parsing fails, or the value is negative or out of range
///
/// # Example
///
/// ```
/// use lobcore::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("120.999"), Some(12_099_900_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64
///
/// Returns None if the value is negative or out of range.
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    let rounded = scaled.round_dp(0);
    rounded.to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
///
/// # Example
///
/// ```
/// use lobcore::types::price::from_fixed;
///
/// assert_eq!(from_fixed(100_000_000), "1.00000000");
/// assert_eq!(from_fixed(5_000_012_345_678), "50000.12345678");
/// ```
pub fn from_fixed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{:.8}", decimal)
}

/// Convert fixed-point u64 to a human-readable string (trimmed trailing zeros)
///
/// # Example
///
/// ```
/// use lobcore::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// assert_eq!(from_fixed_trimmed(150_000_000), "1.5");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    let decimal = fixed_to_decimal(value);
    format!("{}", decimal.normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================
