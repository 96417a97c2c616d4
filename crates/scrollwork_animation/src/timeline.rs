//! Sequenced tweens
//!
//! A [`Timeline`] places several tweens on one clock. Each entry is positioned
//! relative to what is already on the timeline: appended after the current
//! end, overlapping it by some amount, or at an absolute time.
//!
//! ```rust
//! use scrollwork_animation::{Position, Timeline, TransitionSpec, Tween, VisualState};
//! use scrollwork_core::{Document, Property, Rect, Viewport};
//!
//! let mut doc = Document::new(Viewport::default());
//! let title = doc.insert("title", Rect::new(0.0, 0.0, 600.0, 80.0));
//! let subtitle = doc.insert("subtitle", Rect::new(0.0, 100.0, 600.0, 40.0));
//!
//! let fade = TransitionSpec::builder(
//!     VisualState::new().with(Property::Opacity, 0.0),
//!     VisualState::new().with(Property::Opacity, 1.0),
//! )
//! .duration_secs(1.0)
//! .build()
//! .unwrap();
//!
//! let mut timeline = Timeline::new();
//! timeline
//!     .add(Tween::new(fade.clone(), [title]), Position::Append)
//!     .add(Tween::new(fade, [subtitle]), Position::Overlap(500.0));
//!
//! assert_eq!(timeline.duration_ms(), 1500.0);
//! ```

use scrollwork_core::LayoutHost;
use tracing::debug;

use crate::player::Tween;

/// Placement of a tween on a timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// After everything already on the timeline
    Append,
    /// Start this many milliseconds before the current end
    Overlap(f32),
    /// Absolute start time in milliseconds
    At(f32),
}

#[derive(Clone, Debug)]
struct TimelineEntry {
    tween: Tween,
    offset_ms: f32,
}

/// A set of tweens played on a shared clock
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    end_ms: f32,
    time_ms: f32,
    playing: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a tween on the timeline
    ///
    /// Each entry plays one cycle; repeat settings of the tween are not
    /// applied inside a timeline.
    pub fn add(&mut self, tween: Tween, position: Position) -> &mut Self {
        let offset_ms = match position {
            Position::Append => self.end_ms,
            Position::Overlap(ms) => (self.end_ms - ms).max(0.0),
            Position::At(ms) => ms.max(0.0),
        };
        self.end_ms = self.end_ms.max(offset_ms + tween.total_ms());
        self.entries.push(TimelineEntry { tween, offset_ms });
        self
    }

    /// Start time of entry `index`, including its group delay
    pub fn start_of(&self, index: usize) -> Option<f32> {
        self.entries
            .get(index)
            .map(|e| e.offset_ms + e.tween.spec().delay_ms())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn duration_ms(&self) -> f32 {
        self.end_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.time_ms
    }

    /// Render every entry's from-state and start the clock
    pub fn start<H: LayoutHost + ?Sized>(&mut self, host: &mut H) {
        for entry in &self.entries {
            entry.tween.render_from(host);
        }
        self.time_ms = 0.0;
        self.playing = !self.entries.is_empty();
        debug!(entries = self.entries.len(), duration_ms = self.end_ms, "timeline started");
    }

    /// Stop the clock where it is
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Advance by `dt` seconds; returns `true` while still playing
    pub fn tick<H: LayoutHost + ?Sized>(&mut self, dt: f32, host: &mut H) -> bool {
        if !self.playing {
            return false;
        }
        self.time_ms = (self.time_ms + dt.max(0.0) * 1000.0).min(self.end_ms);

        for entry in &self.entries {
            let local = self.time_ms - entry.offset_ms - entry.tween.spec().delay_ms();
            if local >= 0.0 {
                entry
                    .tween
                    .render_at(host, local.min(entry.tween.span_ms()));
            }
        }

        if self.time_ms >= self.end_ms {
            self.playing = false;
            debug!("timeline complete");
        }
        self.playing
    }
}
