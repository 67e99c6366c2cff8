//! Trade type representing an executed match between two orders.

use crate::types::price::{OrderId, Price, Quantity};

/// A trade is a single execution between an aggressive and a passive order.
///
/// ## Price Discovery
///
/// Trades always print at the passive (resting) order's price. An
/// aggressive limit that crosses the book trades at the resting side's
/// price, never at its own limit.
///
/// ## Timestamp
///
/// The timestamp is the book's monotonic counter at the moment of the
/// trade. It advances once per submission, not per trade, so all trades
/// from one submission share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trade {
    /// Order id of the buy side of the trade
    pub buy_order_id: OrderId,

    /// Order id of the sell side of the trade
    pub sell_order_id: OrderId,

    /// Execution price in ticks (the passive order's price)
    pub price: Price,

    /// Executed quantity
    pub quantity: Quantity,

    /// Book timestamp counter at execution
    pub timestamp: u64,
}

impl Trade {
    /// Notional value of this trade (price * quantity) in raw fixed-point.
    ///
    /// The result carries the price scale; divide by `SCALE` for currency
    /// units.
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.quantity as u128)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_fields() {
        let trade = Trade {
            buy_order_id: 100,
            sell_order_id: 200,
            price: 10_050,
            quantity: 50,
            timestamp: 3,
        };

        assert_eq!(trade.buy_order_id, 100);
        assert_eq!(trade.sell_order_id, 200);
        assert_eq!(trade.price, 10_050);
        assert_eq!(trade.quantity, 50);
        assert_eq!(trade.timestamp, 3);
    }

    #[test]
    fn test_trade_notional() {
        let trade = Trade {
            buy_order_id: 1,
            sell_order_id: 2,
            price: 10_000,
            quantity: 100,
            timestamp: 1,
        };

        // 100.00 * 100 units = 1_000_000 raw
        assert_eq!(trade.notional_raw(), 1_000_000u128);
    }
}
