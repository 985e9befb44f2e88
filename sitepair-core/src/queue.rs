//! FIFO value queues backing the pairing engine.
//!
//! One queue holds scalars of one kind. Two capacity policies:
//!
//! - **Bounded** - fixed logical capacity, push on a full queue fails
//!   without mutating state (the caller drops the value and continues).
//! - **Growable** - capacity doubles when exhausted, with overflow-checked
//!   arithmetic; allocation failure leaves the queue in its prior valid
//!   state and surfaces as a push error.
//!
//! Storage is a flat `Vec` with a `start` cursor: `start` is the pop
//! position, the vector length is the push position. Live elements are
//! compacted back to offset 0 before any (re)allocation, so both indices
//! stay plain counters rather than wrapping ring indices. The queue
//! normalizes both to 0 whenever it drains, so arbitrarily many push/pop
//! cycles never drift the indices.

use thiserror::Error;

/// Capacity policy, chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// At most this many unmatched values; overflow drops new data.
    Bounded(usize),
    /// Doubling growth; overflow only on true memory exhaustion.
    Growable,
}

/// A rejected push. The queue is unchanged in either case.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// Bounded queue at its limit.
    #[error("queue full (max {limit}), dropping value")]
    Full { limit: usize },
    /// Growable queue could not reserve the target capacity.
    #[error("queue allocation failed (wanted {requested} slots), dropping value")]
    Alloc { requested: usize },
}

/// FIFO queue of one scalar kind.
pub struct ValueQueue<T> {
    data: Vec<T>,
    start: usize,
    policy: CapacityPolicy,
}

impl<T: Copy> ValueQueue<T> {
    /// Create a queue with the given policy. A bounded queue allocates its
    /// full capacity up front and never reallocates.
    pub fn new(policy: CapacityPolicy) -> Self {
        let data = match policy {
            CapacityPolicy::Bounded(limit) => Vec::with_capacity(limit),
            CapacityPolicy::Growable => Vec::new(),
        };
        Self {
            data,
            start: 0,
            policy,
        }
    }

    /// Fixed-capacity queue; the (limit+1)-th unmatched push fails.
    pub fn bounded(limit: usize) -> Self {
        Self::new(CapacityPolicy::Bounded(limit))
    }

    /// Dynamically growing queue.
    pub fn growable() -> Self {
        Self::new(CapacityPolicy::Growable)
    }

    /// The policy this queue was built with.
    #[inline]
    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// Logical size: push position minus pop position.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len().saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.data.len()
    }

    /// Append a value, or report why it cannot be stored.
    pub fn push_back(&mut self, value: T) -> Result<(), PushError> {
        match self.policy {
            CapacityPolicy::Bounded(limit) => {
                if self.len() >= limit {
                    return Err(PushError::Full { limit });
                }
                // Physical slots exhausted but logical room remains: slide
                // the live elements back to offset 0.
                if self.data.len() == limit {
                    self.compact();
                }
                self.data.push(value);
                Ok(())
            }
            CapacityPolicy::Growable => {
                if self.data.len() == self.data.capacity() {
                    self.compact();
                }
                if self.data.len() == self.data.capacity() {
                    self.grow()?;
                }
                self.data.push(value);
                Ok(())
            }
        }
    }

    /// Remove and return the oldest value, `None` when empty. Indices
    /// normalize back to 0 once the queue drains.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.start >= self.data.len() {
            return None;
        }
        let value = self.data[self.start];
        self.start += 1;
        if self.start == self.data.len() {
            self.data.clear();
            self.start = 0;
        }
        Some(value)
    }

    /// Drop all elements in O(1). Capacity is retained so a growable queue
    /// amortizes reallocation across blocks.
    pub fn reset(&mut self) {
        self.data.clear();
        self.start = 0;
    }

    /// Move live elements to offset 0 and reclaim the popped prefix.
    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        let live = self.data.len() - self.start;
        self.data.copy_within(self.start.., 0);
        self.data.truncate(live);
        self.start = 0;
    }

    /// Reserve room for one more element. A failed reservation leaves the
    /// queue untouched; that path only triggers under real memory
    /// exhaustion, so tests cover the target arithmetic instead.
    fn grow(&mut self) -> Result<(), PushError> {
        let required = self
            .data
            .len()
            .checked_add(1)
            .ok_or(PushError::Alloc { requested: usize::MAX })?;
        let target = grow_target(self.data.capacity(), required);
        let additional = target - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|_| PushError::Alloc { requested: target })?;
        Ok(())
    }
}

/// Doubling growth target, at least `required`. If doubling would overflow
/// `usize`, fall back to the exact required capacity.
fn grow_target(capacity: usize, required: usize) -> usize {
    let mut target = capacity.max(4);
    while target < required {
        match target.checked_mul(2) {
            Some(next) => target = next,
            None => return required,
        }
    }
    target
}
