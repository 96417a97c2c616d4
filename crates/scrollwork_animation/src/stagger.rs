//! Batch stagger timing
//!
//! A batch of `count` elements shares one transition. Element `i` starts
//! `i * stagger` after the batch start, and every element runs for the same
//! duration, so the batch spans `(count - 1) * stagger + duration`.
//!
//! Times here are measured from the batch start, after any group delay.

/// Timing of one staggered batch, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchTiming {
    count: usize,
    duration_ms: f32,
    stagger_ms: f32,
}

impl BatchTiming {
    pub fn new(count: usize, duration_ms: f32, stagger_ms: f32) -> Self {
        Self {
            count,
            duration_ms: duration_ms.max(0.0),
            stagger_ms: stagger_ms.max(0.0),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Start of element `i` relative to the batch start
    pub fn start_offset(&self, index: usize) -> f32 {
        index as f32 * self.stagger_ms
    }

    /// Total length of one pass over the batch
    pub fn span_ms(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.start_offset(self.count - 1) + self.duration_ms
    }

    /// Linear progress of element `i` at `time_ms` after the batch start
    pub fn local_progress(&self, index: usize, time_ms: f32) -> f32 {
        let local = time_ms - self.start_offset(index);
        if self.duration_ms <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Progress of element `i` when the whole batch is scrubbed to `progress`
    ///
    /// Each element owns its slice of the batch span, so elements complete in
    /// index order as the batch moves from 0 to 1.
    pub fn scrub_local(&self, index: usize, progress: f32) -> f32 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        let span = self.span_ms();
        if span <= 0.0 {
            return progress;
        }
        self.local_progress(index, progress * span)
    }
}
