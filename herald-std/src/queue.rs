//! Deferred-submission queue.
//!
//! An ordered FIFO buffer of `(tag, parameter)` pairs awaiting a batch
//! flush. The queue is expected to be filled and drained from a single
//! logical writer at a time, but the drain step itself is indivisible:
//! enqueues racing a drain land wholly in the detached batch or wholly in
//! the fresh queue, never both, never neither.

use herald_core::{Payload, Tag};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// FIFO buffer of deferred commands.
pub struct SubmissionQueue<K, P> {
    entries: Mutex<VecDeque<(K, P)>>,
}

impl<K: Tag, P: Payload> SubmissionQueue<K, P> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Append an entry to the tail. Always succeeds.
    pub fn enqueue(&self, tag: K, param: P) {
        self.entries.lock().push_back((tag, param));
    }

    /// Detach the entire current contents and install an empty queue, as
    /// one indivisible step.
    pub fn drain_and_reset(&self) -> VecDeque<(K, P)> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the queue has no pending entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<K: Tag, P: Payload> Default for SubmissionQueue<K, P> {
    fn default() -> Self {
        Self::new()
    }
}
