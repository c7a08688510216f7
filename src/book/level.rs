//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` is the FIFO queue of all orders resting at a single
//! price on one side. The queue is a doubly-linked list threaded
//! through the side's order slab; this struct holds only the queue
//! metadata plus its own position in the side's priority heap.
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be unlinked in O(1) using its slab key
//!
//! A level that exists in a side book is never empty: the side book
//! evicts a level the moment its last order is removed.

use slab::Slab;

use crate::book::OrderNode;

/// A price level containing orders at a single price.
///
/// The actual order data lives in the owning side book's slab; this
/// struct only holds the queue metadata.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Head of the order queue (oldest order, slab key)
    /// This is the first order to be matched
    head: Option<usize>,

    /// Tail of the order queue (newest order, slab key)
    /// New orders are appended here
    tail: Option<usize>,

    /// Number of orders at this price level
    len: usize,

    /// Current index of this level in the side book's priority heap.
    /// Written back by the heap on every swap so the level can be
    /// evicted from an arbitrary position in O(log L).
    pub(crate) heap_pos: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: u64) -> Self {
        Self {
            price,
            head: None,
            tail: None,
            len: 0,
            heap_pos: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of orders at this price level
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Get the head order's slab key (oldest order)
    ///
    /// This is the first order to be matched at this price level.
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Add an order to the tail of the queue
    ///
    /// This maintains FIFO ordering - oldest orders are matched first.
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = slab.get_mut(key).expect("Invalid slab key");

        // Update linked list pointers
        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            // Link the old tail to the new node
            let tail_node = slab.get_mut(tail_key).expect("Invalid tail key");
            tail_node.next = Some(key);
        } else {
            // Empty list - this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.len += 1;
    }

    /// Unlink an order from the queue by slab key
    ///
    /// The node stays in the slab; removing it from storage is the side
    /// book's job. O(1).
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = slab.get(key).expect("Invalid slab key");
        let prev_key = node.prev;
        let next_key = node.next;

        // Update the previous node's next pointer
        if let Some(prev) = prev_key {
            let prev_node = slab.get_mut(prev).expect("Invalid prev key");
            prev_node.next = next_key;
        } else {
            // This was the head
            self.head = next_key;
        }

        // Update the next node's prev pointer
        if let Some(next) = next_key {
            let next_node = slab.get_mut(next).expect("Invalid next key");
            next_node.prev = prev_key;
        } else {
            // This was the tail
            self.tail = prev_key;
        }

        // Clear the removed node's pointers
        let node = slab.get_mut(key).expect("Invalid slab key");
        node.prev = None;
        node.next = None;

        self.len -= 1;
    }

    /// Move an order to the back of the queue, losing its time priority.
    ///
    /// Used when an update modifies a resting order in any way other
    /// than a pure quantity decrease.
    pub fn move_to_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        if self.tail == Some(key) {
            return;
        }
        self.remove(key, slab);
        self.push_back(key, slab);
    }

    /// Cumulative volume of all orders at this level.
    ///
    /// Walks the queue, O(m) for m orders. Not on the hot path.
    pub fn volume(&self, slab: &Slab<OrderNode>) -> u64 {
        let mut total: u64 = 0;
        let mut cur = self.head;
        while let Some(key) = cur {
            let node = slab.get(key).expect("Invalid slab key");
            total = total.saturating_add(node.quantity());
            cur = node.next;
        }
        total
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
