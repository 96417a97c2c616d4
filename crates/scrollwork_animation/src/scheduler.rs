//! Frame request queue
//!
//! Work that needs another frame (a tween mid-flight, a smoothed scrub still
//! chasing its target) asks for one with [`FrameScheduler::request`]. The
//! host's per-frame tick drains the queue with [`FrameScheduler::take_frame`]
//! and services each key. Keys are slotmap keys, so a request for something
//! removed in the meantime simply fails its lookup when serviced; callers
//! must still check liveness before writing.

use slotmap::{Key, SecondaryMap};

/// Deduplicating queue of keys waiting for the next frame
#[derive(Debug)]
pub struct FrameScheduler<K: Key> {
    queue: Vec<K>,
    pending: SecondaryMap<K, ()>,
    frame: u64,
}

impl<K: Key> FrameScheduler<K> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            pending: SecondaryMap::new(),
            frame: 0,
        }
    }

    /// Ask for `key` to be serviced on the next frame
    ///
    /// Returns `false` if it was already queued.
    pub fn request(&mut self, key: K) -> bool {
        if self.pending.contains_key(key) {
            return false;
        }
        self.pending.insert(key, ());
        self.queue.push(key);
        true
    }

    /// Drop a pending request
    pub fn cancel(&mut self, key: K) -> bool {
        if self.pending.remove(key).is_none() {
            return false;
        }
        self.queue.retain(|k| *k != key);
        true
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(key)
    }

    /// Take every request queued for this frame, in request order
    pub fn take_frame(&mut self) -> Vec<K> {
        self.frame += 1;
        self.pending.clear();
        std::mem::take(&mut self.queue)
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.pending.clear();
        self.queue.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Number of frames taken so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl<K: Key> Default for FrameScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
