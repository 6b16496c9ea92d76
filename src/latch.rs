//! Hand-off of the latest target result from the vision thread to readers.
//!
//! One writer, any number of readers. Both fields, the publish sequence and
//! the publish instant live in a single record behind one `Mutex`, so a reader
//! always sees values written by the same `publish` call.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Horizontal target center (pixels) and range (inches) for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameResult {
    pub center_x: f64,
    pub distance: f64,
}

impl FrameResult {
    /// `distance == 0` only before the first target has been acquired.
    pub fn has_target(&self) -> bool {
        self.distance != 0.0
    }
}

/// A result together with when it was published.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StampedResult {
    pub result: FrameResult,
    /// Number of publishes so far; 0 means the result is the initial value.
    pub sequence: u64,
    pub published_at: Option<Instant>,
}

impl StampedResult {
    /// Time since the last publish, `None` before the first one.
    pub fn age(&self) -> Option<Duration> {
        self.published_at.map(|at| at.elapsed())
    }
}

#[derive(Debug, Default)]
pub struct ResultLatch {
    slot: Mutex<StampedResult>,
}

impl ResultLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored result.
    pub fn publish(&self, result: FrameResult) {
        let mut slot = self.lock();
        slot.result = result;
        slot.sequence += 1;
        slot.published_at = Some(Instant::now());
    }

    /// Latest published result, or `{0, 0}` before the first publish.
    pub fn snapshot(&self) -> FrameResult {
        self.lock().result
    }

    pub fn snapshot_stamped(&self) -> StampedResult {
        *self.lock()
    }

    // The record is plain data and every critical section is a copy, so a
    // poisoned lock still holds a consistent value.
    fn lock(&self) -> MutexGuard<'_, StampedResult> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
