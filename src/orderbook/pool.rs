//! Pre-allocated order storage with O(1) acquire and release.
//!
//! ## Design
//!
//! The pool owns a [`Slab`] of [`OrderNode`] records created with the full
//! capacity up front, so steady-state order flow causes no heap traffic:
//! acquiring pops a slot off the slab's internal free list and releasing
//! pushes it back. Freed slot keys are re-issued to later acquires.
//!
//! The slab itself would grow past its initial allocation if allowed to;
//! the pool adds the hard capacity bound the book relies on, reporting
//! [`BookError::PoolExhausted`] instead of reallocating.
//!
//! ## Ownership
//!
//! The pool is the sole owner of all order storage. Price levels and the
//! order index refer to records by slot key and must drop those keys
//! before the book releases the slot.

use slab::Slab;

use crate::orderbook::error::{BookError, BookResult};
use crate::orderbook::node::OrderNode;

/// Bounded arena of order records.
#[derive(Debug)]
pub struct OrderPool {
    /// Pre-allocated node storage; keys are reused after release
    slots: Slab<OrderNode>,

    /// Hard bound on live records
    capacity: usize,
}

impl OrderPool {
    /// Create a pool with storage for `capacity` orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
            capacity,
        }
    }

    /// Acquire a slot holding a defaulted (zeroed) order record.
    ///
    /// Fails with [`BookError::PoolExhausted`] when every slot is live; the
    /// pool is left unchanged in that case.
    #[inline]
    pub fn acquire(&mut self) -> BookResult<usize> {
        if self.slots.len() >= self.capacity {
            return Err(BookError::PoolExhausted {
                capacity: self.capacity,
            });
        }
        Ok(self.slots.insert(OrderNode::default()))
    }

    /// Release a previously acquired slot, returning its record.
    ///
    /// The key may be handed out again by a later [`acquire`](Self::acquire);
    /// the caller must drop every copy of it first.
    ///
    /// # Panics
    ///
    /// Panics if the key does not refer to a live slot.
    #[inline]
    pub fn release(&mut self, key: usize) -> OrderNode {
        self.slots
            .try_remove(key)
            .expect("released slot is not live")
    }

    /// Get the record at a live slot.
    ///
    /// # Panics
    ///
    /// Panics if the key does not refer to a live slot.
    #[inline]
    pub fn get(&self, key: usize) -> &OrderNode {
        self.slots.get(key).expect("stale order slot key")
    }

    /// Get the record at a live slot, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the key does not refer to a live slot.
    #[inline]
    pub fn get_mut(&mut self, key: usize) -> &mut OrderNode {
        self.slots.get_mut(key).expect("stale order slot key")
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live (acquired) records.
    #[inline]
    pub fn live(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots available to acquire.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity - self.slots.len()
    }

    /// Whether no slot is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether every slot is live.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
