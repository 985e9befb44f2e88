//! Per-block pairing state and the lock-step pair flusher.
//!
//! One `BlockState` spans one measurement block: the identifying context,
//! the two value queues, and the 1-based output counter. A reset drops
//! identifiers and any unmatched leftovers irrevocably; queue capacity is
//! retained so growable queues amortize allocation across blocks.

use std::io;

use crate::dispatch::ValueSlot;
use crate::emit::{Record, Sink};
use crate::queue::{CapacityPolicy, PushError, ValueQueue};
use crate::scalar::Scalar;

/// Rendered when the input never provided a site identifier.
pub const UNKNOWN_SITE: &str = "(unknown_site)";
/// Rendered when the input never provided secondary context.
pub const UNKNOWN_CONTEXT: &str = "(unknown_date)";

/// State scoped to one measurement block.
pub struct BlockState {
    site_id: Option<String>,
    context: Option<String>,
    first: ValueQueue<Scalar>,
    second: ValueQueue<Scalar>,
    seq: u32,
}

impl BlockState {
    /// Fresh block state; both queues share the capacity policy.
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            site_id: None,
            context: None,
            first: ValueQueue::new(policy),
            second: ValueQueue::new(policy),
            seq: 1,
        }
    }

    /// Site identifier for subsequent records. `None` means truly absent
    /// and renders as [`UNKNOWN_SITE`]; `Some("")` renders as an empty
    /// field.
    pub fn set_site_id(&mut self, id: Option<String>) {
        self.site_id = id;
    }

    /// Secondary context text (e.g. a record version time).
    pub fn set_context(&mut self, context: Option<String>) {
        self.context = context;
    }

    /// Buffer one decoded value into the given slot.
    pub fn push(&mut self, slot: ValueSlot, value: Scalar) -> Result<(), PushError> {
        match slot {
            ValueSlot::First => self.first.push_back(value),
            ValueSlot::Second => self.second.push_back(value),
        }
    }

    /// Unmatched values still buffered, per slot.
    pub fn pending(&self) -> (usize, usize) {
        (self.first.len(), self.second.len())
    }

    /// Drain both queues in lock-step, emitting one record per matched
    /// pair. Returns how many records were emitted.
    pub fn flush_pairs<S: Sink>(&mut self, sink: &mut S) -> io::Result<usize> {
        let mut emitted = 0usize;
        while !self.first.is_empty() && !self.second.is_empty() {
            let (Some(first), Some(second)) = (self.first.pop_front(), self.second.pop_front())
            else {
                break;
            };
            sink.record(&Record {
                seq: self.seq,
                site: self.site_id.as_deref().unwrap_or(UNKNOWN_SITE),
                context: self.context.as_deref().unwrap_or(UNKNOWN_CONTEXT),
                first,
                second,
            })?;
            self.seq += 1;
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Drop identifiers and leftovers; the counter restarts at 1.
    pub fn reset(&mut self) {
        self.site_id = None;
        self.context = None;
        self.first.reset();
        self.second.reset();
        self.seq = 1;
    }
}
