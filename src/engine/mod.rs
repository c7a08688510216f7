//! Matching engine layer.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same operation sequence always produces the
//!    same trades and the same resting book
//! 2. **Fixed-Point Math**: all prices and quantities are scaled u64
//! 3. **Synchronous Execution**: no async, no locking; callers
//!    serialize operations
//! 4. **Price-Time Priority**: best price first, FIFO within a level
//!
//! ## Matching Rules
//!
//! - **Bids** match against asks, lowest price first
//! - **Asks** match against bids, highest price first
//! - Fills execute at the maker's resting price
//! - Unfilled quantity rests on the book as a limit order

pub mod matcher;

pub use matcher::OrderBook;
