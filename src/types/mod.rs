//! Core data types for the matching engine.
//!
//! All numeric values use fixed-point representation (scaled by 10^8),
//! and the value types implement SSZ serialization for deterministic
//! encoding.
//!
//! ## Types
//!
//! - [`Order`]: A limit order, resting or incoming
//! - [`Side`]: Ask or Bid
//! - [`Trade`]: A fill between a maker and a taker order
//! - [`BookError`]: Error values surfaced at the API boundary

mod error;
mod order;
mod trade;
pub mod price;

// Re-export all types at module level
pub use error::BookError;
pub use order::{Order, Side};
pub use trade::Trade;
