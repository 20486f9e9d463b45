//! Concurrent FIFO buffers feeding the entry points
//!
//! Arrival threads push pending vehicle ids while the tick drains them under
//! its own lock. A pending id is peeked, not popped, until a grid cell is
//! actually granted, so a blocked entry retries the same id next tick.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Monotonic vehicle id source shared by all arrival producers
#[derive(Debug)]
pub struct VehicleIdGen {
    next: AtomicU64,
}

impl VehicleIdGen {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for VehicleIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// An unbounded FIFO of pending vehicle ids for one entry point
#[derive(Debug, Default)]
pub struct EntryQueue {
    pending: Mutex<VecDeque<u64>>,
}

impl EntryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a pending id. Safe to call from arrival threads.
    pub fn push(&self, id: u64) {
        self.pending.lock().push_back(id);
    }

    /// Look at the oldest pending id without removing it
    pub fn peek(&self) -> Option<u64> {
        self.pending.lock().front().copied()
    }

    /// Remove and return the oldest pending id
    pub fn pop(&self) -> Option<u64> {
        self.pending.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    pub fn clear(&self) {
        self.pending.lock().clear();
    }
}
