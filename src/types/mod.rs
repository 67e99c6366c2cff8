//! Core data types for lobcore.
//!
//! All prices are fixed-point `u64` values scaled by 10^2 (one tick is
//! 0.01). See [`price`] for the conversion helpers.
//!
//! ## Types
//!
//! - [`Order`]: an order record as stored in the book's pool
//! - [`Side`]: Buy or Sell
//! - [`OrderType`]: Limit or Market
//! - [`OrderStatus`]: lifecycle state machine
//! - [`Trade`]: an executed match between two orders
//! - [`SubmitResult`]: per-submission execution report

mod order;
mod report;
mod trade;
pub mod price;

// Re-export all types at module level
pub use order::{Order, OrderStatus, OrderType, Side};
pub use price::{OrderId, Price, Quantity, INVALID_PRICE};
pub use report::SubmitResult;
pub use trade::Trade;
