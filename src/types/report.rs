//! Per-submission execution report.

use crate::types::order::OrderStatus;
use crate::types::price::{OrderId, Quantity};
use crate::types::trade::Trade;

/// Result of a single order submission.
///
/// Carries the assigned order id (always populated, even for a market
/// order cancelled for lack of liquidity), the final status, the fill
/// totals and every trade the submission produced, earliest first.
#[derive(Debug, Clone, Default)]
pub struct SubmitResult {
    /// Id assigned to the submitted order
    pub order_id: OrderId,

    /// Final status after matching and the resting decision
    pub status: OrderStatus,

    /// Total quantity executed by this submission
    pub filled_quantity: Quantity,

    /// Quantity left unfilled (resting for limits, abandoned for markets)
    pub remaining_quantity: Quantity,

    /// Trades produced by this submission, in execution order
    pub trades: Vec<Trade>,
}

impl SubmitResult {
    pub(crate) fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            ..Self::default()
        }
    }

    /// Whether the submission executed in full.
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
