//! Central limit order book for a single instrument.
//!
//! ## Architecture
//!
//! The book uses a hybrid data structure:
//!
//! - **Pool**: pre-allocated order storage for O(1) acquire/release
//! - **BTreeMap**: sorted price levels for best-first iteration
//! - **HashMap**: order id to pool key mapping for O(1) cancel
//!
//! ## Price Ordering
//!
//! - **Bids** (buy orders): keyed by `Reverse(price)`, first key = best bid
//! - **Asks** (sell orders): keyed by price, first key = best ask
//!
//! ## Concurrency
//!
//! A book is single-threaded: public operations take `&mut self` and run
//! to completion. Callers needing shared access must serialise externally.
//!
//! ## Example
//!
//! ```
//! use lobcore::orderbook::OrderBook;
//! use lobcore::types::{OrderType, Side};
//!
//! let mut book = OrderBook::with_capacity(10_000);
//!
//! book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
//! book.submit(Side::Sell, OrderType::Limit, 10_100, 100).unwrap();
//!
//! assert_eq!(book.best_bid(), 10_000);
//! assert_eq!(book.best_ask(), 10_100);
//! assert_eq!(book.spread(), 100);
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::trace;

use crate::orderbook::error::BookResult;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::pool::OrderPool;
use crate::types::price::{OrderId, Price, Quantity, INVALID_PRICE};
use crate::types::{Order, OrderStatus, OrderType, Side, SubmitResult, Trade};

/// Default pool capacity when none is given.
const DEFAULT_POOL_CAPACITY: usize = 1_000_000;

/// Central limit order book with integrated matching.
///
/// Maintains price-sorted levels per side, each holding a time-ordered
/// queue of resting orders, and matches incoming orders with strict
/// price-time priority. Trades always print at the passive order's price.
pub struct OrderBook {
    /// Bid price levels, `Reverse(price)` keyed so iteration starts at the
    /// highest price
    pub(crate) bids: BTreeMap<Reverse<Price>, PriceLevel>,

    /// Ask price levels, iteration starts at the lowest price
    pub(crate) asks: BTreeMap<Price, PriceLevel>,

    /// Resting orders only: order id to pool key
    pub(crate) order_index: HashMap<OrderId, usize>,

    /// Pre-allocated order storage
    pub(crate) pool: OrderPool,

    /// Last issued order id; ids start at 1 and strictly increase
    pub(crate) next_order_id: OrderId,

    /// Monotonic tie-breaker, advanced once per submission
    pub(crate) timestamp_counter: u64,

    /// Trades executed over the book's life
    pub(crate) trade_count: u64,

    /// Quantity traded over the book's life
    pub(crate) total_volume: u64,

    /// Optional synchronous trade sink
    pub(crate) trade_callback: Option<Box<dyn FnMut(&Trade)>>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a book with the default pool capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Create a book whose pool holds at most `capacity` resting orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::with_capacity(capacity / 2),
            pool: OrderPool::with_capacity(capacity),
            next_order_id: 0,
            timestamp_counter: 0,
            trade_count: 0,
            total_volume: 0,
            trade_callback: None,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Submit an order.
    ///
    /// Assigns a fresh id and timestamp, matches against the opposite side,
    /// then rests any limit residual or discards a market residual. The
    /// returned report carries the id, final status, fill totals and every
    /// trade in execution order.
    ///
    /// Fails with [`PoolExhausted`](crate::orderbook::BookError::PoolExhausted)
    /// when no order slot is free; the book is unchanged in that case.
    pub fn submit(
        &mut self,
        side: Side,
        kind: OrderType,
        price: Price,
        quantity: Quantity,
    ) -> BookResult<SubmitResult> {
        let key = self.pool.acquire()?;

        self.next_order_id += 1;
        self.timestamp_counter += 1;
        let id = self.next_order_id;
        self.pool.get_mut(key).order =
            Order::new(id, side, kind, price, quantity, self.timestamp_counter);

        trace!(order_id = id, ?side, ?kind, price, quantity, "submit");

        let mut result = SubmitResult::new(id);
        self.match_incoming(key, &mut result);

        let order = self.pool.get(key).order;
        result.filled_quantity = order.filled_quantity;
        result.remaining_quantity = order.remaining();

        if order.is_fully_filled() {
            result.status = OrderStatus::Filled;
            self.pool.release(key);
        } else if kind == OrderType::Limit {
            let status = if order.filled_quantity > 0 {
                OrderStatus::PartiallyFilled
            } else {
                OrderStatus::Active
            };
            self.pool.get_mut(key).order.status = status;
            result.status = status;
            self.rest_order(key);
            self.order_index.insert(id, key);
        } else {
            // Unfilled market remainder is abandoned, never rested
            result.status = OrderStatus::Cancelled;
            self.pool.release(key);
        }

        Ok(result)
    }

    /// Cancel a resting order by id.
    ///
    /// Returns `false` without touching the book when the id is unknown,
    /// already filled, already cancelled, or belonged to a market order.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        let Some(&key) = self.order_index.get(&order_id) else {
            return false;
        };
        trace!(order_id, "cancel");

        let (side, price) = {
            let order = &self.pool.get(key).order;
            (order.side, order.price)
        };

        match side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(price)) {
                    level.remove(key, &mut self.pool);
                    if level.is_empty() {
                        self.bids.remove(&Reverse(price));
                    }
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&price) {
                    level.remove(key, &mut self.pool);
                    if level.is_empty() {
                        self.asks.remove(&price);
                    }
                }
            }
        }

        self.order_index.remove(&order_id);
        self.pool.release(key);
        true
    }

    /// Change a resting order's total quantity.
    ///
    /// - `new_quantity <= filled`: equivalent to cancel
    /// - reduce: in place, queue position preserved
    /// - increase: cancel plus a fresh submission, losing time priority
    ///   (the new order id is not reported)
    /// - unchanged: no-op
    ///
    /// Returns `false` when the order is not resting.
    pub fn modify(&mut self, order_id: OrderId, new_quantity: Quantity) -> bool {
        let Some(&key) = self.order_index.get(&order_id) else {
            return false;
        };
        let order = self.pool.get(key).order;
        trace!(order_id, new_quantity, "modify");

        if new_quantity <= order.filled_quantity {
            return self.cancel(order_id);
        }

        if new_quantity < order.quantity {
            let delta = order.quantity - new_quantity;
            self.pool.get_mut(key).order.quantity = new_quantity;
            match order.side {
                Side::Buy => {
                    if let Some(level) = self.bids.get_mut(&Reverse(order.price)) {
                        level.reduce_quantity(delta);
                    }
                }
                Side::Sell => {
                    if let Some(level) = self.asks.get_mut(&order.price) {
                        level.reduce_quantity(delta);
                    }
                }
            }
            return true;
        }

        if new_quantity > order.quantity {
            self.cancel(order_id);
            // A slot was just freed, so the resubmit cannot exhaust the pool
            return self
                .submit(order.side, OrderType::Limit, order.price, new_quantity)
                .is_ok();
        }

        true
    }

    /// Install a sink invoked synchronously for each trade, in execution
    /// order, before the submitting call returns.
    ///
    /// The callback must not mutate the book it was invoked from.
    pub fn set_trade_callback(&mut self, callback: impl FnMut(&Trade) + 'static) {
        self.trade_callback = Some(Box::new(callback));
    }

    // ========================================================================
    // Market Data Queries
    // ========================================================================

    /// Highest bid price, or [`INVALID_PRICE`] when no bids rest.
    #[inline]
    pub fn best_bid(&self) -> Price {
        self.bids.keys().next().map_or(INVALID_PRICE, |r| r.0)
    }

    /// Lowest ask price, or [`INVALID_PRICE`] when no asks rest.
    #[inline]
    pub fn best_ask(&self) -> Price {
        self.asks.keys().next().copied().unwrap_or(INVALID_PRICE)
    }

    /// Best ask minus best bid, or [`INVALID_PRICE`] when either side is
    /// empty.
    pub fn spread(&self) -> Price {
        let bid = self.best_bid();
        let ask = self.best_ask();
        if bid == INVALID_PRICE || ask == INVALID_PRICE {
            return INVALID_PRICE;
        }
        ask.saturating_sub(bid)
    }

    /// Aggregate remaining quantity at a price, 0 when no level exists.
    pub fn volume_at_price(&self, side: Side, price: Price) -> Quantity {
        match side {
            Side::Buy => self
                .bids
                .get(&Reverse(price))
                .map_or(0, |level| level.total_quantity),
            Side::Sell => self.asks.get(&price).map_or(0, |level| level.total_quantity),
        }
    }

    /// Number of resting orders at a price, 0 when no level exists.
    pub fn order_count_at_price(&self, side: Side, price: Price) -> usize {
        match side {
            Side::Buy => self
                .bids
                .get(&Reverse(price))
                .map_or(0, |level| level.order_count),
            Side::Sell => self.asks.get(&price).map_or(0, |level| level.order_count),
        }
    }

    /// Up to `levels` bid levels from best to worst as
    /// `(price, aggregate remaining)` pairs. The snapshot is a copy.
    pub fn bid_depth(&self, levels: usize) -> Vec<(Price, Quantity)> {
        self.bids
            .iter()
            .take(levels)
            .map(|(price, level)| (price.0, level.total_quantity))
            .collect()
    }

    /// Up to `levels` ask levels from best to worst as
    /// `(price, aggregate remaining)` pairs. The snapshot is a copy.
    pub fn ask_depth(&self, levels: usize) -> Vec<(Price, Quantity)> {
        self.asks
            .iter()
            .take(levels)
            .map(|(price, level)| (*price, level.total_quantity))
            .collect()
    }

    // ========================================================================
    // Book State
    // ========================================================================

    /// Number of resting orders across both sides.
    #[inline]
    pub fn total_orders(&self) -> usize {
        self.order_index.len()
    }

    /// Number of bid price levels.
    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask price levels.
    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Whether no order rests on either side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_index.is_empty()
    }

    /// Trades executed over the book's life.
    #[inline]
    pub fn total_trades(&self) -> u64 {
        self.trade_count
    }

    /// Quantity traded over the book's life.
    #[inline]
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    /// Pool capacity (maximum resting orders).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Link a residual limit order into its side's level, creating the
    /// level on first use of that price.
    fn rest_order(&mut self, key: usize) {
        let (side, price) = {
            let order = &self.pool.get(key).order;
            (order.side, order.price)
        };
        match side {
            Side::Buy => {
                let level = self
                    .bids
                    .entry(Reverse(price))
                    .or_insert_with(|| PriceLevel::new(price));
                level.push_back(key, &mut self.pool);
            }
            Side::Sell => {
                let level = self
                    .asks
                    .entry(price)
                    .or_insert_with(|| PriceLevel::new(price));
                level.push_back(key, &mut self.pool);
            }
        }
    }

    // ========================================================================
    // Structural Validation (test and debug aid, not a hot-path facility)
    // ========================================================================

    /// Walk both sides and the order index, asserting every structural
    /// invariant: cached level aggregates match their queues, no level is
    /// empty, queue timestamps strictly increase head to tail, every queued
    /// order is indexed at its own key, every live pool slot is reachable,
    /// and the book is uncrossed.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn check_invariants(&self) {
        let mut reachable = 0usize;

        for (price, level) in &self.asks {
            reachable += self.check_level(Side::Sell, *price, level);
        }
        for (price, level) in &self.bids {
            reachable += self.check_level(Side::Buy, price.0, level);
        }

        assert_eq!(
            reachable,
            self.order_index.len(),
            "order index size must equal queued order count"
        );
        assert_eq!(
            reachable,
            self.pool.live(),
            "every live pool slot must be queued"
        );

        let bid = self.best_bid();
        let ask = self.best_ask();
        if bid != INVALID_PRICE && ask != INVALID_PRICE {
            assert!(bid < ask, "book is crossed: bid {} >= ask {}", bid, ask);
        }
    }

    fn check_level(&self, side: Side, price: Price, level: &PriceLevel) -> usize {
        assert!(!level.is_empty(), "empty level at price {}", price);
        assert_eq!(level.price, price, "level price mismatch");

        let mut count = 0usize;
        let mut total: Quantity = 0;
        let mut last_timestamp = 0u64;
        let mut walk = level.head;

        while let Some(key) = walk {
            let node = self.pool.get(key);
            let order = &node.order;

            assert_eq!(order.side, side, "order {} on wrong side", order.id);
            assert_eq!(order.price, price, "order {} at wrong level", order.id);
            assert!(
                order.timestamp > last_timestamp,
                "FIFO violated at price {}",
                price
            );
            last_timestamp = order.timestamp;
            if order.quantity > 0 {
                assert!(
                    order.filled_quantity < order.quantity,
                    "fully filled order {} still resting",
                    order.id
                );
            }
            assert_eq!(
                self.order_index.get(&order.id),
                Some(&key),
                "order {} not indexed at its key",
                order.id
            );

            count += 1;
            total += order.remaining();
            walk = node.next;
        }

        assert_eq!(level.order_count, count, "cached count wrong at {}", price);
        assert_eq!(
            level.total_quantity, total,
            "cached quantity wrong at {}",
            price
        );
        count
    }
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBook")
            .field("bid_levels", &self.bids.len())
            .field("ask_levels", &self.asks.len())
            .field("total_orders", &self.order_index.len())
            .field("capacity", &self.pool.capacity())
            .field("trade_count", &self.trade_count)
            .field("total_volume", &self.total_volume)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::error::BookError;

    fn book() -> OrderBook {
        OrderBook::with_capacity(1_000)
    }

    #[test]
    fn test_new_book_is_empty() {
        let book = book();

        assert!(book.is_empty());
        assert_eq!(book.total_orders(), 0);
        assert_eq!(book.bid_levels(), 0);
        assert_eq!(book.ask_levels(), 0);
        assert_eq!(book.best_bid(), INVALID_PRICE);
        assert_eq!(book.best_ask(), INVALID_PRICE);
        assert_eq!(book.spread(), INVALID_PRICE);
        assert_eq!(book.total_trades(), 0);
        assert_eq!(book.total_volume(), 0);
    }

    #[test]
    fn test_resting_buy_limit() {
        let mut book = book();

        let result = book.submit(Side::Buy, OrderType::Limit, 10_000, 50).unwrap();
        assert_eq!(result.status, OrderStatus::Active);
        assert_eq!(result.filled_quantity, 0);
        assert_eq!(result.remaining_quantity, 50);
        assert!(result.trades.is_empty());

        assert_eq!(book.total_orders(), 1);
        assert_eq!(book.bid_levels(), 1);
        assert_eq!(book.best_bid(), 10_000);
        book.check_invariants();
    }

    #[test]
    fn test_order_ids_strictly_increase() {
        let mut book = book();

        let r1 = book.submit(Side::Buy, OrderType::Limit, 9_900, 10).unwrap();
        let r2 = book.submit(Side::Buy, OrderType::Limit, 9_800, 10).unwrap();
        let r3 = book.submit(Side::Sell, OrderType::Market, 0, 5).unwrap();

        assert!(r1.order_id > 0);
        assert!(r2.order_id > r1.order_id);
        // Even a market id is issued from the same sequence
        assert!(r3.order_id > r2.order_id);
    }

    #[test]
    fn test_best_prices_across_levels() {
        let mut book = book();

        book.submit(Side::Buy, OrderType::Limit, 9_900, 100).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 10_000, 200).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 9_800, 150).unwrap();
        book.submit(Side::Sell, OrderType::Limit, 10_100, 100).unwrap();
        book.submit(Side::Sell, OrderType::Limit, 10_200, 200).unwrap();
        book.submit(Side::Sell, OrderType::Limit, 10_050, 150).unwrap();

        assert_eq!(book.best_bid(), 10_000);
        assert_eq!(book.best_ask(), 10_050);
        assert_eq!(book.spread(), 50);
        assert_eq!(book.bid_levels(), 3);
        assert_eq!(book.ask_levels(), 3);
        book.check_invariants();
    }

    #[test]
    fn test_volume_and_count_at_price() {
        let mut book = book();

        book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 10_000, 200).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 10_000, 50).unwrap();

        assert_eq!(book.volume_at_price(Side::Buy, 10_000), 350);
        assert_eq!(book.order_count_at_price(Side::Buy, 10_000), 3);
        assert_eq!(book.volume_at_price(Side::Buy, 9_900), 0);
        assert_eq!(book.order_count_at_price(Side::Sell, 10_000), 0);
        assert_eq!(book.bid_levels(), 1);
    }

    #[test]
    fn test_depth_snapshots() {
        let mut book = book();

        book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 9_900, 200).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 9_800, 300).unwrap();
        book.submit(Side::Sell, OrderType::Limit, 10_100, 150).unwrap();
        book.submit(Side::Sell, OrderType::Limit, 10_200, 250).unwrap();

        let bids = book.bid_depth(2);
        assert_eq!(bids, vec![(10_000, 100), (9_900, 200)]);

        let asks = book.ask_depth(5);
        assert_eq!(asks, vec![(10_100, 150), (10_200, 250)]);

        // Snapshot is a copy, later mutation leaves it alone
        book.submit(Side::Buy, OrderType::Limit, 10_050, 10).unwrap();
        assert_eq!(bids[0], (10_000, 100));
    }

    #[test]
    fn test_cancel_clears_level() {
        let mut book = book();

        let result = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        assert_eq!(book.bid_levels(), 1);

        assert!(book.cancel(result.order_id));
        assert_eq!(book.total_orders(), 0);
        assert_eq!(book.bid_levels(), 0);
        assert_eq!(book.best_bid(), INVALID_PRICE);
        book.check_invariants();
    }

    #[test]
    fn test_cancel_keeps_sibling_orders() {
        let mut book = book();

        let r1 = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 10_000, 200).unwrap();

        assert!(book.cancel(r1.order_id));
        assert_eq!(book.bid_levels(), 1);
        assert_eq!(book.volume_at_price(Side::Buy, 10_000), 200);
        book.check_invariants();
    }

    #[test]
    fn test_cancel_unknown_returns_false() {
        let mut book = book();
        assert!(!book.cancel(99_999));

        let result = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        assert!(book.cancel(result.order_id));
        // Second cancel of the same id is a no-op
        assert!(!book.cancel(result.order_id));
    }

    #[test]
    fn test_modify_reduce_preserves_position() {
        let mut book = book();

        let r1 = book.submit(Side::Sell, OrderType::Limit, 10_000, 500).unwrap();
        book.submit(Side::Sell, OrderType::Limit, 10_000, 100).unwrap();

        assert!(book.modify(r1.order_id, 300));
        assert_eq!(book.volume_at_price(Side::Sell, 10_000), 400);
        book.check_invariants();

        // Still first in the queue: an aggressive buy hits it first
        let result = book.submit(Side::Buy, OrderType::Limit, 10_000, 300).unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].sell_order_id, r1.order_id);
    }

    #[test]
    fn test_modify_increase_loses_priority() {
        let mut book = book();

        let r1 = book.submit(Side::Sell, OrderType::Limit, 10_000, 100).unwrap();
        let r2 = book.submit(Side::Sell, OrderType::Limit, 10_000, 100).unwrap();

        assert!(book.modify(r1.order_id, 200));
        assert_eq!(book.volume_at_price(Side::Sell, 10_000), 300);
        assert_eq!(book.total_orders(), 2);
        book.check_invariants();

        // The increased order re-entered at the back of the queue
        let result = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        assert_eq!(result.trades[0].sell_order_id, r2.order_id);
    }

    #[test]
    fn test_modify_to_filled_or_less_cancels() {
        let mut book = book();

        let r = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        assert!(book.modify(r.order_id, 0));
        assert_eq!(book.total_orders(), 0);
        assert_eq!(book.bid_levels(), 0);
    }

    #[test]
    fn test_modify_same_quantity_noop() {
        let mut book = book();

        let r = book.submit(Side::Buy, OrderType::Limit, 10_000, 100).unwrap();
        assert!(book.modify(r.order_id, 100));
        assert_eq!(book.volume_at_price(Side::Buy, 10_000), 100);
        assert_eq!(book.total_orders(), 1);
    }

    #[test]
    fn test_modify_unknown_returns_false() {
        let mut book = book();
        assert!(!book.modify(12_345, 100));
    }

    #[test]
    fn test_pool_exhaustion_leaves_book_unchanged() {
        let mut book = OrderBook::with_capacity(2);

        book.submit(Side::Buy, OrderType::Limit, 9_900, 10).unwrap();
        book.submit(Side::Buy, OrderType::Limit, 9_800, 10).unwrap();

        let err = book
            .submit(Side::Buy, OrderType::Limit, 9_700, 10)
            .unwrap_err();
        assert_eq!(err, BookError::PoolExhausted { capacity: 2 });
        assert_eq!(book.total_orders(), 2);
        book.check_invariants();

        // Freeing a slot makes submission possible again, with a fresh id
        let bid = book.best_bid();
        assert!(book.cancel(1));
        let result = book.submit(Side::Buy, OrderType::Limit, 9_700, 10).unwrap();
        assert!(result.order_id > 2);
        assert_ne!(book.best_bid(), bid);
    }

    #[test]
    fn test_zero_quantity_limit_rests_active() {
        let mut book = book();

        let result = book.submit(Side::Sell, OrderType::Limit, 10_000, 0).unwrap();
        assert_eq!(result.status, OrderStatus::Active);
        assert_eq!(result.remaining_quantity, 0);
        assert_eq!(book.total_orders(), 1);
        assert_eq!(book.ask_levels(), 1);
        book.check_invariants();

        // It holds no liquidity and leaves only via cancel
        assert_eq!(book.volume_at_price(Side::Sell, 10_000), 0);
        assert!(book.cancel(result.order_id));
        assert_eq!(book.ask_levels(), 0);
    }

    #[test]
    fn test_debug_format() {
        let book = book();
        let rendered = format!("{:?}", book);
        assert!(rendered.contains("OrderBook"));
        assert!(rendered.contains("total_orders"));
    }
}
