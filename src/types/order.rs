//! Order types for the lobcore matching engine.
//!
//! ## Fixed-Point Representation
//!
//! Prices are stored as u64 scaled by 10^2 (see [`crate::types::price`]).
//! Quantities are whole units.
//!
//! ## Lifecycle
//!
//! An [`Order`] is created by the book when a submission acquires a pool
//! slot, mutated only by the owning book, and released back to the pool on
//! full fill, cancel, or discard of an unfilled market remainder.

use crate::types::price::{OrderId, Price, Quantity, INVALID_PRICE};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid) - wants to purchase the asset
    #[default]
    Buy,
    /// Sell order (ask) - wants to sell the asset
    Sell,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// Order type enumeration.
///
/// Limit orders rest on the book when not fully matched; market orders
/// never rest and ignore their price argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderType {
    /// Limit order - executes at the specified price or better
    #[default]
    Limit,
    /// Market order - executes against whatever liquidity exists
    Market,
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Order lifecycle status.
///
/// `New` is the state between slot acquisition and the resting decision.
/// `Filled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Created, not yet matched or rested
    #[default]
    New,
    /// Resting on the book with no fills
    Active,
    /// Resting on the book with some quantity filled
    PartiallyFilled,
    /// Fully executed (terminal)
    Filled,
    /// Cancelled by the user or discarded market remainder (terminal)
    Cancelled,
}

impl OrderStatus {
    /// True for states an order cannot leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order record as stored in the book's pool.
///
/// The default value is the zeroed record a freshly acquired pool slot
/// holds. Queue linkage lives on [`crate::orderbook::OrderNode`], not here.
///
/// ## Example
///
/// ```
/// use lobcore::types::{Order, OrderType, Side};
///
/// // Buy 100 units at 100.50
/// let order = Order::new(1, Side::Buy, OrderType::Limit, 10_050, 100, 1);
/// assert_eq!(order.remaining(), 100);
/// assert!(!order.is_fully_filled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Unique order identifier (assigned by the book)
    pub id: OrderId,

    /// Buy or Sell
    pub side: Side,

    /// Limit or Market
    pub kind: OrderType,

    /// Limit price in ticks; 0 for market orders
    pub price: Price,

    /// Total quantity
    pub quantity: Quantity,

    /// Quantity filled so far
    pub filled_quantity: Quantity,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Monotonic book counter used for FIFO tie-breaking, assigned once
    /// per submission
    pub timestamp: u64,
}

impl Default for Order {
    fn default() -> Self {
        Self {
            id: 0,
            side: Side::Buy,
            kind: OrderType::Limit,
            price: INVALID_PRICE,
            quantity: 0,
            filled_quantity: 0,
            status: OrderStatus::New,
            timestamp: 0,
        }
    }
}

impl Order {
    /// Create a new order record.
    pub fn new(
        id: OrderId,
        side: Side,
        kind: OrderType,
        price: Price,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            side,
            kind,
            price,
            quantity,
            filled_quantity: 0,
            status: OrderStatus::New,
            timestamp,
        }
    }

    /// Unfilled quantity.
    #[inline]
    pub fn remaining(&self) -> Quantity {
        self.quantity.saturating_sub(self.filled_quantity)
    }

    /// Whether every unit of a non-empty order has executed.
    ///
    /// A zero-quantity order is never considered filled: it can rest on the
    /// book with remaining 0 and leaves only via cancel.
    #[inline]
    pub fn is_fully_filled(&self) -> bool {
        self.quantity > 0 && self.filled_quantity >= self.quantity
    }

    /// Fill a portion of this order, clamped to the remaining quantity.
    ///
    /// Returns the quantity actually filled.
    #[inline]
    pub fn fill(&mut self, qty: Quantity) -> Quantity {
        let actual = qty.min(self.remaining());
        self.filled_quantity += actual;
        actual
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_status_terminal() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Active.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
    }

    #[test]
    fn test_order_new() {
        let order = Order::new(1, Side::Buy, OrderType::Limit, 10_050, 100, 7);

        assert_eq!(order.id, 1);
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.kind, OrderType::Limit);
        assert_eq!(order.price, 10_050);
        assert_eq!(order.quantity, 100);
        assert_eq!(order.filled_quantity, 0);
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.timestamp, 7);
        assert_eq!(order.remaining(), 100);
        assert!(!order.is_fully_filled());
    }

    #[test]
    fn test_order_default_is_zeroed() {
        let order = Order::default();
        assert_eq!(order.id, 0);
        assert_eq!(order.price, INVALID_PRICE);
        assert_eq!(order.quantity, 0);
        assert_eq!(order.status, OrderStatus::New);
    }

    #[test]
    fn test_order_fill() {
        let mut order = Order::new(1, Side::Buy, OrderType::Limit, 10_000, 100, 1);

        // Partial fill
        let filled = order.fill(30);
        assert_eq!(filled, 30);
        assert_eq!(order.remaining(), 70);
        assert!(!order.is_fully_filled());

        // Fill the rest
        let filled = order.fill(70);
        assert_eq!(filled, 70);
        assert_eq!(order.remaining(), 0);
        assert!(order.is_fully_filled());
    }

    #[test]
    fn test_order_overfill_clamps() {
        let mut order = Order::new(1, Side::Sell, OrderType::Limit, 10_000, 100, 1);

        let filled = order.fill(200);
        assert_eq!(filled, 100);
        assert_eq!(order.remaining(), 0);
        assert!(order.is_fully_filled());
    }

    #[test]
    fn test_zero_quantity_never_filled() {
        let order = Order::new(1, Side::Buy, OrderType::Limit, 10_000, 0, 1);
        assert_eq!(order.remaining(), 0);
        assert!(!order.is_fully_filled());
    }
}
