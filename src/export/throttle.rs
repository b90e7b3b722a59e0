//! Pacing for bulk glyph generation.
//!
//! Bundle sizes are generated in batches with optional pauses after each
//! item and after each batch, which keeps peak work bounded when an
//! interactive host shares the thread. Generation is always sequential and in
//! declared order; the policy only inserts waits.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Batch size and pauses used while generating bundle sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThrottlePolicy {
    /// Items per batch. Zero is treated as one.
    pub batch_size: usize,
    /// Pause after each generated item, in milliseconds.
    pub item_pause_ms: u64,
    /// Pause after each batch, in milliseconds.
    pub batch_pause_ms: u64,
}

impl Default for ThrottlePolicy {
    /// Batches of three with no pauses.
    fn default() -> Self {
        Self {
            batch_size: 3,
            item_pause_ms: 0,
            batch_pause_ms: 0,
        }
    }
}

impl ThrottlePolicy {
    /// Pacing suited to a host that must keep repainting during exports:
    /// 100 ms between items, 500 ms between batches.
    pub fn interactive() -> Self {
        Self {
            batch_size: 3,
            item_pause_ms: 100,
            batch_pause_ms: 500,
        }
    }

    /// Sequential generation without any pauses.
    pub fn unthrottled() -> Self {
        Self::default()
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn item_pause(&self) -> Duration {
        Duration::from_millis(self.item_pause_ms)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    /// Splits `items` into batches of [`effective_batch_size`](Self::effective_batch_size).
    pub fn batches<'a, T>(&self, items: &'a [T]) -> std::slice::Chunks<'a, T> {
        items.chunks(self.effective_batch_size())
    }

    pub(crate) fn after_item(&self) {
        pause(self.item_pause());
    }

    pub(crate) fn after_batch(&self) {
        pause(self.batch_pause());
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
