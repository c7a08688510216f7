//! The order book and its matching routine.
//!
//! ## Matching Rules
//!
//! - Incoming bids match against asks, lowest price first
//! - Incoming asks match against bids, highest price first
//! - Within a price level, resting orders fill in arrival order (FIFO)
//! - Fills execute at the maker's resting price
//! - Any unfilled remainder rests on the incoming order's own side
//!
//! ## Example
//!
//! ```
//! use lobcore::{OrderBook, Side};
//!
//! let mut book = OrderBook::new();
//!
//! // Resting bid for 5 units at 100.0
//! book.insert(1, Side::Bid, 10_000_000_000, 5).unwrap();
//!
//! // Incoming ask crosses and fills 3 units at the bid's price
//! let trades = book.insert(2, Side::Ask, 10_000_000_000, 3).unwrap();
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].volume, 3);
//! assert_eq!(trades[0].maker_order_id, 1);
//! ```

use sha2::{Digest, Sha256};
use tracing::{debug, trace};

use crate::book::SideBook;
use crate::types::{BookError, Order, Side, Trade};

/// A dual-sided limit order book with price-time priority matching.
///
/// The book owns one [`SideBook`] per side and is the only component
/// that moves liquidity between them. All operations are synchronous
/// and single-threaded; callers serialize access.
#[derive(Debug)]
pub struct OrderBook {
    /// Resting sell orders (lowest price is best)
    asks: SideBook,

    /// Resting buy orders (highest price is best)
    bids: SideBook,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new() -> Self {
        Self {
            asks: SideBook::new(Side::Ask),
            bids: SideBook::new(Side::Bid),
        }
    }

    /// Create an order book with pre-allocated per-side order capacity
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            asks: SideBook::with_capacity(Side::Ask, order_capacity),
            bids: SideBook::with_capacity(Side::Bid, order_capacity),
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    /// The ask side of the book
    #[inline]
    pub fn asks(&self) -> &SideBook {
        &self.asks
    }

    /// The bid side of the book
    #[inline]
    pub fn bids(&self) -> &SideBook {
        &self.bids
    }

    /// Best (lowest) ask price, or None if no asks rest
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// Best (highest) bid price, or None if no bids rest
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    /// The spread (best_ask - best_bid), or None if either side is empty
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Number of ask price levels
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Number of bid price levels
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Total number of resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.asks.order_count() + self.bids.order_count()
    }

    /// Check if neither side holds any orders
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }

    /// Check if an order id rests on either side
    pub fn contains(&self, order_id: u64) -> bool {
        self.asks.contains(order_id) || self.bids.contains(order_id)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Insert a new bid or ask, returning any resulting trades.
    ///
    /// The incoming order first matches against the opposite side of
    /// the book; any unfilled quantity rests behind existing orders at
    /// its price level. A zero `volume` produces no trades and rests
    /// nothing.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the id already rests on either side. The check
    /// runs before matching, so a rejected insert leaves the book
    /// untouched.
    pub fn insert(
        &mut self,
        order_id: u64,
        side: Side,
        price: u64,
        volume: u64,
    ) -> Result<Vec<Trade>, BookError> {
        trace!(order_id, ?side, price, volume, "insert");
        if self.contains(order_id) {
            return Err(BookError::DuplicateId(order_id));
        }
        self.execute(side, order_id, price, volume)
    }

    /// Modify an existing limit order, returning any resulting trades.
    ///
    /// - `volume` of zero removes the order.
    /// - Same price, smaller volume: decremented in place; the order
    ///   keeps its queue position.
    /// - Same price, volume at or above the current quantity: the
    ///   volume is set and the order moves to the back of its level's
    ///   queue (loses time priority).
    /// - Changed price: the order is removed and re-matched against the
    ///   opposite side at its new price, resting any remainder.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id rests on neither side. Late updates to
    /// orders that have already filled land here; treat it as a
    /// non-fatal signal.
    pub fn update(
        &mut self,
        order_id: u64,
        price: u64,
        volume: u64,
    ) -> Result<Vec<Trade>, BookError> {
        let side = if self.asks.contains(order_id) {
            Side::Ask
        } else if self.bids.contains(order_id) {
            Side::Bid
        } else {
            debug!(order_id, "update for unknown order, likely already filled");
            return Err(BookError::NotFound(order_id));
        };

        let book = match side {
            Side::Ask => &mut self.asks,
            Side::Bid => &mut self.bids,
        };

        if volume == 0 {
            book.remove(order_id)?;
            return Ok(Vec::new());
        }

        let resting = book.get(order_id).expect("order vanished under update");
        let (resting_price, resting_quantity) = (resting.price, resting.quantity);

        if price != resting_price {
            // Reprice: pull the order and re-run matching at the new
            // price, resting any remainder behind that level's queue.
            book.remove(order_id)?;
            return self.execute(side, order_id, price, volume);
        }

        if volume < resting_quantity {
            // Pure decrease keeps time priority
            if let Some(order) = book.get_mut(order_id) {
                order.quantity = volume;
            }
            return Ok(Vec::new());
        }

        // Anything else forfeits the queue position
        if let Some(order) = book.get_mut(order_id) {
            order.quantity = volume;
        }
        book.move_to_back(order_id);
        Ok(Vec::new())
    }

    /// Cancel a resting order on either side.
    ///
    /// # Errors
    ///
    /// `NotFound` only if neither side held the order. Which side it
    /// was found on is not reported.
    pub fn cancel(&mut self, order_id: u64) -> Result<(), BookError> {
        let ask = self.asks.remove(order_id);
        let bid = self.bids.remove(order_id);
        if ask.is_err() && bid.is_err() {
            debug!(order_id, "cancel for unknown order");
            return Err(BookError::NotFound(order_id));
        }
        Ok(())
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// Match an incoming order against the opposite side, then rest any
    /// remainder on its own side.
    ///
    /// Walks the maker book best-first, consuming each level from the
    /// front. Fills commit incrementally: every iteration either
    /// reduces the incoming quantity or terminates the loop.
    fn execute(
        &mut self,
        side: Side,
        taker_id: u64,
        price: u64,
        mut quantity: u64,
    ) -> Result<Vec<Trade>, BookError> {
        let mut trades = Vec::new();

        let (maker_book, taker_book) = match side {
            Side::Ask => (&mut self.bids, &mut self.asks),
            Side::Bid => (&mut self.asks, &mut self.bids),
        };

        while quantity > 0 {
            let (maker_id, maker_price, fill, exhausted) = match maker_book.peek_mut() {
                Some(maker) if side.crosses(price, maker.price) => {
                    let fill = maker.fill(quantity);
                    (maker.id, maker.price, fill, maker.is_filled())
                }
                _ => break,
            };

            quantity -= fill;
            trades.push(Trade::new(maker_price, fill, taker_id, maker_id));

            if exhausted {
                // Collapses the level when this was its last order,
                // advancing the loop to the next-best price.
                maker_book
                    .remove(maker_id)
                    .expect("maker order vanished mid-match");
            }
        }

        // Rest any unfilled quantity as a new limit order, queued behind
        // existing orders at the same price level.
        if quantity > 0 {
            taker_book.push(Order::new(taker_id, side, price, quantity))?;
        }

        Ok(trades)
    }

    // ========================================================================
    // State digest
    // ========================================================================

    /// SHA-256 digest of every resting order, bids then asks, best
    /// price first and FIFO within each level.
    ///
    /// Identical operation sequences produce identical digests, which
    /// makes this the cheap equality check used by the determinism and
    /// round-trip tests.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for side in [&self.bids, &self.asks] {
            for order in side.resting_orders() {
                let bytes = ssz_rs::serialize(order).expect("orders are fixed-size ssz");
                hasher.update(&bytes);
            }
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::to_fixed;

    fn px(s: &str) -> u64 {
        to_fixed(s).unwrap()
    }

    #[test]
    fn test_insert_rests_without_counterparty() {
        let mut book = OrderBook::new();

        let trades = book.insert(1, Side::Bid, px("100.00"), 5).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.best_bid(), Some(px("100.00")));
        assert_eq!(book.bids().get(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_simple_match_partial_maker() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100.00"), 5).unwrap();

        let trades = book.insert(2, Side::Ask, px("100.00"), 3).unwrap();

        assert_eq!(trades, vec![Trade::new(px("100.00"), 3, 2, 1)]);
        assert_eq!(book.bids().get(1).unwrap().quantity, 2);
        assert!(book.asks().is_empty());
    }

    #[test]
    fn test_partial_fill_rests_residual() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100.00"), 2).unwrap();

        // Ask at 99 crosses the bid at 100; fill executes at the
        // maker's price and the leftover rests at 99
        let trades = book.insert(2, Side::Ask, px("99.00"), 5).unwrap();

        assert_eq!(trades, vec![Trade::new(px("100.00"), 2, 2, 1)]);
        assert!(book.bids().is_empty());

        let resting = book.asks().get(2).unwrap();
        assert_eq!(resting.price, px("99.00"));
        assert_eq!(resting.quantity, 3);
    }

    #[test]
    fn test_multi_level_sweep() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("101"), 1).unwrap();
        book.insert(2, Side::Bid, px("100"), 2).unwrap();
        book.insert(3, Side::Bid, px("99"), 5).unwrap();

        let trades = book.insert(4, Side::Ask, px("99"), 6).unwrap();

        assert_eq!(
            trades,
            vec![
                Trade::new(px("101"), 1, 4, 1),
                Trade::new(px("100"), 2, 4, 2),
                Trade::new(px("99"), 3, 4, 3),
            ]
        );
        assert!(book.asks().is_empty());
        assert_eq!(book.bids().order_count(), 1);
        assert_eq!(book.bids().get(3).unwrap().quantity, 2);
    }

    #[test]
    fn test_fifo_within_level() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 1).unwrap();
        book.insert(2, Side::Bid, px("100"), 1).unwrap();

        let trades = book.insert(3, Side::Ask, px("100"), 1).unwrap();
        assert_eq!(trades[0].maker_order_id, 1, "older order must fill first");
    }

    #[test]
    fn test_insert_zero_volume() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();

        let trades = book.insert(2, Side::Ask, px("100"), 0).unwrap();
        assert!(trades.is_empty());
        assert!(!book.contains(2));
        assert_eq!(book.bids().get(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_insert_duplicate_id() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        let before = book.state_digest();

        // Same side
        assert_eq!(
            book.insert(1, Side::Bid, px("101"), 5),
            Err(BookError::DuplicateId(1))
        );
        // Opposite side, non-crossing
        assert_eq!(
            book.insert(1, Side::Ask, px("200"), 5),
            Err(BookError::DuplicateId(1))
        );
        // Opposite side, would have crossed; rejected before matching
        assert_eq!(
            book.insert(1, Side::Ask, px("100"), 5),
            Err(BookError::DuplicateId(1))
        );

        assert_eq!(book.state_digest(), before, "rejected insert mutated the book");
    }

    #[test]
    fn test_quantity_conservation() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Ask, px("100"), 3).unwrap();
        book.insert(2, Side::Ask, px("101"), 4).unwrap();
        book.insert(3, Side::Ask, px("102"), 5).unwrap();

        let incoming = 10;
        let trades = book.insert(4, Side::Bid, px("101"), incoming).unwrap();

        let filled: u64 = trades.iter().map(|t| t.volume).sum();
        let residual = book.bids().get(4).map_or(0, |o| o.quantity);
        assert_eq!(filled + residual, incoming);
        assert_eq!(filled, 7); // levels 100 and 101 consumed
        assert_eq!(book.best_bid(), Some(px("101")));
        assert_eq!(book.best_ask(), Some(px("102")));
    }

    #[test]
    fn test_update_quantity_decrease_keeps_priority() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        book.insert(2, Side::Bid, px("100"), 5).unwrap();

        let trades = book.update(1, px("100"), 3).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.bids().get(1).unwrap().quantity, 3);

        let trades = book.insert(3, Side::Ask, px("100"), 1).unwrap();
        assert_eq!(trades[0].maker_order_id, 1, "decrease must keep queue position");
    }

    #[test]
    fn test_update_quantity_increase_loses_priority() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 1).unwrap();
        book.insert(2, Side::Bid, px("100"), 1).unwrap();

        let trades = book.update(1, px("100"), 5).unwrap();
        assert!(trades.is_empty());
        assert_eq!(book.bids().get(1).unwrap().quantity, 5);

        let trades = book.insert(3, Side::Ask, px("100"), 1).unwrap();
        assert_eq!(trades[0].maker_order_id, 2, "increase must forfeit queue position");
    }

    #[test]
    fn test_update_equal_quantity_loses_priority() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 1).unwrap();
        book.insert(2, Side::Bid, px("100"), 1).unwrap();

        // Same price, same volume still counts as a modification
        book.update(1, px("100"), 1).unwrap();

        let trades = book.insert(3, Side::Ask, px("100"), 1).unwrap();
        assert_eq!(trades[0].maker_order_id, 2);
    }

    #[test]
    fn test_update_zero_volume_removes() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Ask, px("100"), 5).unwrap();

        let trades = book.update(1, px("100"), 0).unwrap();
        assert!(trades.is_empty());
        assert!(!book.contains(1));
        assert!(book.is_empty());

        assert_eq!(book.cancel(1), Err(BookError::NotFound(1)));
    }

    #[test]
    fn test_update_price_change_rematches() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        book.insert(2, Side::Ask, px("105"), 5).unwrap();

        // Repricing the ask down to 100 crosses the resting bid
        let trades = book.update(2, px("100"), 5).unwrap();
        assert_eq!(trades, vec![Trade::new(px("100"), 5, 2, 1)]);
        assert!(book.is_empty());
    }

    #[test]
    fn test_update_price_change_rests_residual() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Ask, px("105"), 5).unwrap();

        // No counterparty; the repriced order rests at its new level
        let trades = book.update(1, px("104"), 7).unwrap();
        assert!(trades.is_empty());

        let resting = book.asks().get(1).unwrap();
        assert_eq!(resting.price, px("104"));
        assert_eq!(resting.quantity, 7);
        assert_eq!(book.ask_levels(), 1);
    }

    #[test]
    fn test_update_not_found() {
        let mut book = OrderBook::new();
        assert_eq!(book.update(9, px("100"), 5), Err(BookError::NotFound(9)));

        // A filled order behaves like an unknown one
        book.insert(1, Side::Bid, px("100"), 1).unwrap();
        book.insert(2, Side::Ask, px("100"), 1).unwrap();
        assert_eq!(book.update(1, px("100"), 5), Err(BookError::NotFound(1)));
    }

    #[test]
    fn test_cancel() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        book.insert(2, Side::Ask, px("105"), 5).unwrap();

        assert!(book.cancel(1).is_ok());
        assert!(book.cancel(2).is_ok());
        assert!(book.is_empty());
    }

    #[test]
    fn test_cancel_unknown_is_inert() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        let before = book.state_digest();

        assert_eq!(book.cancel(42), Err(BookError::NotFound(42)));
        assert_eq!(book.state_digest(), before);

        // Cancel of a cancelled order is NotFound again
        book.cancel(1).unwrap();
        assert_eq!(book.cancel(1), Err(BookError::NotFound(1)));
    }

    #[test]
    fn test_insert_cancel_round_trip() {
        let mut book = OrderBook::new();
        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        book.insert(2, Side::Ask, px("105"), 5).unwrap();

        let levels_before = (book.bid_levels(), book.ask_levels());
        let digest_before = book.state_digest();

        // Non-crossing insert at a brand-new price, then cancel
        book.insert(3, Side::Bid, px("99"), 7).unwrap();
        assert_eq!(book.bid_levels(), levels_before.0 + 1);
        book.cancel(3).unwrap();

        assert_eq!((book.bid_levels(), book.ask_levels()), levels_before);
        assert_eq!(book.state_digest(), digest_before);
    }

    #[test]
    fn test_spread_and_best_prices() {
        let mut book = OrderBook::new();
        assert!(book.spread().is_none());

        book.insert(1, Side::Bid, px("100"), 5).unwrap();
        assert!(book.spread().is_none());

        book.insert(2, Side::Ask, px("101"), 5).unwrap();
        assert_eq!(book.best_bid(), Some(px("100")));
        assert_eq!(book.best_ask(), Some(px("101")));
        assert_eq!(book.spread(), Some(px("1")));
    }

    #[test]
    fn test_state_digest_determinism() {
        let mut a = OrderBook::new();
        let mut b = OrderBook::new();
        for book in [&mut a, &mut b] {
            book.insert(1, Side::Bid, px("100"), 5).unwrap();
            book.insert(2, Side::Ask, px("101"), 3).unwrap();
            book.insert(3, Side::Bid, px("101"), 2).unwrap();
        }
        assert_eq!(a.state_digest(), b.state_digest());

        b.cancel(1).unwrap();
        assert_ne!(a.state_digest(), b.state_digest());
    }

    #[test]
    fn test_sides_stay_consistent_under_mixed_flow() {
        let mut book = OrderBook::new();

        book.insert(1, Side::Bid, px("100"), 10).unwrap();
        book.insert(2, Side::Bid, px("99"), 10).unwrap();
        book.insert(3, Side::Ask, px("101"), 10).unwrap();
        book.insert(4, Side::Ask, px("100"), 4).unwrap(); // crosses bid 1
        book.update(2, px("100"), 10).unwrap(); // joins level 100, back of queue
        book.insert(5, Side::Ask, px("100"), 10).unwrap(); // sweeps 1 then 2

        book.bids().assert_invariants();
        book.asks().assert_invariants();

        // bid 1: 10 - 4 - 6 = 0, bid 2: 10 - 4 = 6
        assert!(!book.bids().contains(1));
        assert_eq!(book.bids().get(2).unwrap().quantity, 6);
        assert_eq!(book.best_ask(), Some(px("101")));
    }
}
