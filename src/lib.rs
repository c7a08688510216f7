//! # lobcore
//!
//! Single-instrument limit order book core with price-time priority
//! matching.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Side, Trade, BookError)
//! - **Book**: Slab-backed per-side storage - intrusive FIFO queues per
//!   price level, a priority heap of levels, and hash indices for O(1)
//!   same-level insertion and cancellation
//! - **Engine**: The dual-sided [`OrderBook`] and its matching routine
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: All math uses fixed-point arithmetic (10^8 scaling)
//! 3. **Pre-allocated Memory**: Slab allocation keeps order operations O(1)
//! 4. **Synchronous Execution**: No async in the hot path; the caller serializes
//!
//! ## Example
//!
//! ```
//! use lobcore::{OrderBook, Side};
//! use lobcore::types::price::to_fixed;
//!
//! let mut book = OrderBook::new();
//!
//! // A bid rests; a crossing ask fills against it at the bid's price
//! book.insert(1, Side::Bid, to_fixed("100.00").unwrap(), 5).unwrap();
//! let trades = book.insert(2, Side::Ask, to_fixed("99.50").unwrap(), 2).unwrap();
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].price, to_fixed("100.00").unwrap());
//! assert_eq!(book.bids().get(1).unwrap().quantity, 3);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Side, Trade, BookError
pub mod types;

/// Per-side storage: order nodes, price levels, side books
pub mod book;

/// The order book and its matching routine
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use book::{OrderNode, PriceLevel, SideBook};
pub use engine::OrderBook;
pub use types::{BookError, Order, Side, Trade};
