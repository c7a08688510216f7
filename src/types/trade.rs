//! Trade type representing an executed match between two orders.

use ssz_rs::prelude::*;

/// A trade is a single fill between a maker and a taker order.
///
/// ## Terminology
///
/// - **Maker**: The resting order that was already in the book
/// - **Taker**: The incoming order that triggered the match
///
/// ## Price Discovery
///
/// The trade always executes at the maker's resting price, so any price
/// improvement goes to the taker. This is standard price-time priority
/// behavior.
///
/// Trades are produced by matching and returned to the caller; the book
/// never stores them.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Trade {
    /// Execution price in fixed-point (scaled by 10^8)
    /// Always the maker's resting price
    pub price: u64,

    /// Executed quantity in fixed-point (scaled by 10^8)
    pub volume: u64,

    /// Taker order ID (the incoming order)
    pub taker_order_id: u64,

    /// Maker order ID (the resting order)
    pub maker_order_id: u64,
}

impl Trade {
    /// Create a new trade
    ///
    /// # Arguments
    ///
    /// * `price` - Execution price (fixed-point, the maker's price)
    /// * `volume` - Executed quantity (fixed-point)
    /// * `taker_order_id` - ID of the incoming (taker) order
    /// * `maker_order_id` - ID of the resting (maker) order
    pub fn new(price: u64, volume: u64, taker_order_id: u64, maker_order_id: u64) -> Self {
        Self {
            price,
            volume,
            taker_order_id,
            maker_order_id,
        }
    }

    /// Calculate the notional value of this trade (price * volume)
    ///
    /// The result is scaled by 10^16 (10^8 * 10^8); divide by SCALE to
    /// recover a fixed-point value.
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.volume as u128)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
