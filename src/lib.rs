//! # lobcore
//!
//! Low-latency limit order book with an integrated price-time priority
//! matching engine for a single trading instrument.
//!
//! ## Architecture
//!
//! - **Types**: fixed-point scalars, [`Order`], [`Trade`], [`SubmitResult`]
//! - **OrderBook**: price-sorted levels per side over a pre-allocated
//!   order pool, with an order-id index for O(1) cancel
//! - **Engine**: deterministic matching with strict price-time priority
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical submission sequences produce identical
//!    trades; timestamps are a per-book counter, not wall-clock reads
//! 2. **No Floating Point on the hot path**: prices are `u64` ticks
//!    (1 tick = 0.01); float conversions exist only as edge helpers
//! 3. **Pre-allocated Memory**: the pool and the intrusive level queues
//!    keep steady-state order flow free of heap allocation
//! 4. **Single-Threaded**: a book is not internally synchronised; wrap it
//!    or pin it to one thread for shared access
//!
//! ## Example
//!
//! ```
//! use lobcore::{OrderBook, OrderType, Side};
//!
//! let mut book = OrderBook::with_capacity(10_000);
//!
//! // Resting sell, then a crossing buy
//! book.submit(Side::Sell, OrderType::Limit, 10_000, 100).unwrap();
//! let result = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
//!
//! assert!(result.is_filled());
//! assert_eq!(result.trades.len(), 1);
//! assert_eq!(result.trades[0].price, 10_000);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: orders, trades, submission reports, fixed-point prices
pub mod types;

/// Order book: pool, price levels, indices, public operations
pub mod orderbook;

/// Matching engine: the price-time priority hot path
mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use orderbook::{BookError, BookResult, OrderBook, OrderNode, OrderPool, PriceLevel};
pub use types::{Order, OrderStatus, OrderType, Side, SubmitResult, Trade};
