//! Order and side types for the matching core.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are stored as u64 scaled by 10^8 (see
//! [`crate::types::price`]). A scaled integer keeps the price map's
//! hash equality and the priority heap's ordering in exact agreement,
//! which floating-point keys cannot guarantee.
//!
//! ## SSZ Serialization
//!
//! [`Order`] derives `SimpleSerialize` from ssz_rs for deterministic
//! encoding. The side is stored as a raw u8 (`side_raw`) because SSZ
//! containers carry basic types only; use [`Order::side`] to read it.

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Ask (sell) or Bid (buy).
///
/// Represented as u8 for SSZ compatibility:
/// - Ask = 0
/// - Bid = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Ask (sell) side - rests above the spread
    #[default]
    Ask,
    /// Bid (buy) side - rests below the spread
    Bid,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Ask => 0,
            Side::Bid => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Ask),
            1 => Some(Side::Bid),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Ask => Side::Bid,
            Side::Bid => Side::Ask,
        }
    }

    /// Whether an incoming order on this side at `taker_limit` crosses a
    /// resting order at `maker_price`.
    ///
    /// An incoming ask crosses any bid at or above its limit; an incoming
    /// bid crosses any ask at or below its limit.
    #[inline]
    pub fn crosses(self, taker_limit: u64, maker_price: u64) -> bool {
        match self {
            Side::Ask => taker_limit <= maker_price,
            Side::Bid => taker_limit >= maker_price,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting or incoming limit order.
///
/// `quantity` is the *remaining* volume: it is decremented as the order
/// fills, and an order whose quantity reaches zero is removed from the
/// book. Price and quantity use fixed-point representation (scaled by
/// 10^8).
///
/// ## Example
///
/// ```
/// use lobcore::types::{Order, Side};
///
/// // Bid for 1.0 unit at 50000.0
/// let order = Order::new(1, Side::Bid, 5_000_000_000_000, 100_000_000);
/// assert_eq!(order.side(), Side::Bid);
/// assert!(!order.is_filled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier, assigned by the caller
    pub id: u64,

    /// Order side as u8 (0=Ask, 1=Bid)
    /// Stored as u8 for SSZ compatibility
    pub side_raw: u8,

    /// Limit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Remaining quantity in fixed-point (scaled by 10^8)
    /// Decremented as the order is matched
    pub quantity: u64,
}

impl Order {
    /// Create a new limit order
    ///
    /// # Arguments
    ///
    /// * `id` - Unique order identifier
    /// * `side` - Ask or Bid
    /// * `price` - Limit price in fixed-point (scaled by 10^8)
    /// * `quantity` - Volume in fixed-point (scaled by 10^8)
    pub fn new(id: u64, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Ask)
    }

    /// Set the order side
    pub fn set_side(&mut self, side: Side) {
        self.side_raw = side.to_u8();
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.quantity == 0
    }

    /// Fill a portion of this order
    ///
    /// # Arguments
    ///
    /// * `want` - Quantity to fill (in fixed-point)
    ///
    /// # Returns
    ///
    /// The actual quantity filled, clamped to the remaining volume.
    pub fn fill(&mut self, want: u64) -> u64 {
        let actual = want.min(self.quantity);
        self.quantity -= actual;
        actual
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
