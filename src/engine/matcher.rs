//! Price-time priority matching (the hot path).
//!
//! ## Protocol
//!
//! Given an incoming order:
//!
//! 1. Select the opposite side and iterate its levels best-first
//!    (highest bid first, lowest ask first).
//! 2. Stop as soon as a limit order no longer crosses the level price.
//! 3. Within a level, walk the FIFO queue from the head, trading
//!    `min(remaining, remaining)` at the passive order's price.
//! 4. Unlink and release passives that reach full fill; erase levels whose
//!    queues empty.
//!
//! ## Level Iteration
//!
//! Iteration advances with an explicit price cursor
//! ([`BTreeMap::range`](std::collections::BTreeMap::range) past the last
//! visited key) instead of re-reading the best level each round. The
//! cursor guarantees forward progress even when a level survives a full
//! queue walk, which happens only when it holds zero-remaining resting
//! orders that cannot trade.
//!
//! No allocation happens here beyond growing the caller's trade vector.

use std::cmp::Reverse;
use std::ops::Bound::{Excluded, Unbounded};

use tracing::trace;

use crate::orderbook::book::OrderBook;
use crate::types::price::{Price, Quantity};
use crate::types::{OrderType, Side, SubmitResult, Trade};

impl OrderBook {
    /// Match an incoming order (already in the pool at `key`) against the
    /// opposite side, recording trades into `result`.
    pub(crate) fn match_incoming(&mut self, key: usize, result: &mut SubmitResult) {
        match self.pool.get(key).order.side {
            Side::Buy => self.match_against_asks(key, result),
            Side::Sell => self.match_against_bids(key, result),
        }
    }

    /// Buy aggressor: consume asks from the lowest price upward.
    fn match_against_asks(&mut self, aggressor: usize, result: &mut SubmitResult) {
        let (kind, limit) = {
            let order = &self.pool.get(aggressor).order;
            (order.kind, order.price)
        };

        let mut cursor: Option<Price> = None;
        while self.pool.get(aggressor).order.remaining() > 0 {
            let best = match cursor {
                None => self.asks.keys().next().copied(),
                Some(prev) => self
                    .asks
                    .range((Excluded(prev), Unbounded))
                    .map(|(price, _)| *price)
                    .next(),
            };
            let Some(price) = best else { break };

            // Limit order: stop once the ask exceeds our limit
            if kind == OrderType::Limit && price > limit {
                break;
            }

            if self.fill_level(aggressor, Side::Sell, price, result) {
                self.asks.remove(&price);
            }
            cursor = Some(price);
        }
    }

    /// Sell aggressor: consume bids from the highest price downward.
    fn match_against_bids(&mut self, aggressor: usize, result: &mut SubmitResult) {
        let (kind, limit) = {
            let order = &self.pool.get(aggressor).order;
            (order.kind, order.price)
        };

        let mut cursor: Option<Reverse<Price>> = None;
        while self.pool.get(aggressor).order.remaining() > 0 {
            let best = match cursor {
                None => self.bids.keys().next().copied(),
                Some(prev) => self
                    .bids
                    .range((Excluded(prev), Unbounded))
                    .map(|(price, _)| *price)
                    .next(),
            };
            let Some(key) = best else { break };
            let price = key.0;

            // Limit order: stop once the bid falls below our limit
            if kind == OrderType::Limit && price < limit {
                break;
            }

            if self.fill_level(aggressor, Side::Buy, price, result) {
                self.bids.remove(&key);
            }
            cursor = Some(key);
        }
    }

    /// Walk one level's queue head to tail, executing against the
    /// aggressor. Returns whether the level's queue is now empty.
    fn fill_level(
        &mut self,
        aggressor: usize,
        passive_side: Side,
        price: Price,
        result: &mut SubmitResult,
    ) -> bool {
        let mut walk = match passive_side {
            Side::Buy => self.bids.get(&Reverse(price)).and_then(|level| level.head),
            Side::Sell => self.asks.get(&price).and_then(|level| level.head),
        };

        while let Some(passive) = walk {
            let aggressor_remaining = self.pool.get(aggressor).order.remaining();
            if aggressor_remaining == 0 {
                break;
            }

            // The passive may be unlinked below; capture its successor first
            let next = self.pool.get(passive).next;

            let qty = aggressor_remaining.min(self.pool.get(passive).order.remaining());
            if qty > 0 {
                self.execute_trade(aggressor, passive, qty, result);

                if self.pool.get(passive).order.is_fully_filled() {
                    self.retire_filled_passive(passive_side, price, passive);
                }
            }
            // qty == 0 means a zero-remaining straggler; skip it, it leaves
            // only via cancel

            walk = next;
        }

        match passive_side {
            Side::Buy => self
                .bids
                .get(&Reverse(price))
                .is_some_and(|level| level.is_empty()),
            Side::Sell => self.asks.get(&price).is_some_and(|level| level.is_empty()),
        }
    }

    /// Execute one trade: update both fills, the passive level's cached
    /// aggregate, the book counters, the result and the callback.
    fn execute_trade(
        &mut self,
        aggressor: usize,
        passive: usize,
        qty: Quantity,
        result: &mut SubmitResult,
    ) {
        self.pool.get_mut(aggressor).order.fill(qty);
        self.pool.get_mut(passive).order.fill(qty);

        let passive_order = self.pool.get(passive).order;
        match passive_order.side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(passive_order.price)) {
                    level.reduce_quantity(qty);
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&passive_order.price) {
                    level.reduce_quantity(qty);
                }
            }
        }

        let aggressor_order = self.pool.get(aggressor).order;
        let (buy_order_id, sell_order_id) = match aggressor_order.side {
            Side::Buy => (aggressor_order.id, passive_order.id),
            Side::Sell => (passive_order.id, aggressor_order.id),
        };

        // Trades print at the passive (resting) order's price
        let trade = Trade {
            buy_order_id,
            sell_order_id,
            price: passive_order.price,
            quantity: qty,
            timestamp: self.timestamp_counter,
        };

        self.trade_count += 1;
        self.total_volume += qty;
        result.trades.push(trade);
        if let Some(callback) = self.trade_callback.as_mut() {
            callback(&trade);
        }

        trace!(
            buy = buy_order_id,
            sell = sell_order_id,
            price = trade.price,
            qty,
            "trade"
        );
    }

    /// Unlink a fully filled passive from its level, drop its index entry
    /// and return its slot to the pool.
    fn retire_filled_passive(&mut self, side: Side, price: Price, key: usize) {
        match side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(price)) {
                    level.remove(key, &mut self.pool);
                }
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&price) {
                    level.remove(key, &mut self.pool);
                }
            }
        }

        let order_id = {
            let order = &mut self.pool.get_mut(key).order;
            order.status = crate::types::OrderStatus::Filled;
            order.id
        };
        self.order_index.remove(&order_id);
        self.pool.release(key);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
