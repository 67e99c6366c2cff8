//! Matching engine module for lobcore.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same submission sequence always produces the
//!    same trade sequence
//! 2. **Fixed-Point Math**: no floating-point operations
//! 3. **Synchronous Execution**: no async in the hot path; every trade is
//!    delivered to the callback before the submitting call returns
//! 4. **Price-Time Priority**: best price first, then FIFO within a level
//!
//! ## Matching Rules
//!
//! - **Buy orders** match against asks (lowest price first)
//! - **Sell orders** match against bids (highest price first)
//! - **Partial fills** are supported on both sides of a trade
//! - **Trades print at the passive order's price**
//! - **Limit residuals** rest on the book; **market residuals** are
//!   discarded
//!
//! The implementation lives in [`matcher`] as hot-path methods on
//! [`OrderBook`](crate::orderbook::OrderBook), driven by
//! [`submit`](crate::orderbook::OrderBook::submit).

pub(crate) mod matcher;
