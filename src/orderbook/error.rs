//! Error types for order book operations.

use thiserror::Error;

/// Error type for order book operations.
///
/// The only operation-level failure is pool exhaustion; everything else a
/// submission can encounter (empty book, non-crossing price, market into
/// empty book) is an ordinary outcome reported through
/// [`SubmitResult`](crate::types::SubmitResult). Cancel and modify signal
/// an unknown order by returning `false`, not by erroring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// A submission could not acquire an order record. The book is left
    /// unchanged.
    #[error("order pool exhausted: all {capacity} slots in use")]
    PoolExhausted { capacity: usize },
}

/// Result type for order book operations.
pub type BookResult<T> = Result<T, BookError>;
