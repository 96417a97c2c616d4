//! Tween playback
//!
//! A [`Tween`] pairs a validated [`TransitionSpec`] with the batch of
//! elements it animates. A [`TweenPlayer`] drives a tween either by time
//! (`play`/`reverse` + `tick`) or by externally supplied progress
//! (`seek_progress`, used for scrubbing).
//!
//! Timed playback is eased per element; scrubbed playback is linear in
//! progress. Targets that are not attached when a frame is rendered are
//! skipped.

use scrollwork_core::{ElementId, LayoutHost};
use smallvec::SmallVec;
use tracing::trace;

use crate::stagger::BatchTiming;
use crate::transition::TransitionSpec;

/// A transition bound to its target elements
#[derive(Clone, Debug)]
pub struct Tween {
    spec: TransitionSpec,
    targets: SmallVec<[ElementId; 4]>,
    timing: BatchTiming,
}

impl Tween {
    pub fn new(spec: TransitionSpec, targets: impl IntoIterator<Item = ElementId>) -> Self {
        let targets: SmallVec<[ElementId; 4]> = targets.into_iter().collect();
        let timing = BatchTiming::new(targets.len(), spec.duration_ms(), spec.stagger_ms());
        Self {
            spec,
            targets,
            timing,
        }
    }

    pub fn spec(&self) -> &TransitionSpec {
        &self.spec
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    pub fn timing(&self) -> &BatchTiming {
        &self.timing
    }

    /// Length of one cycle, excluding the group delay
    pub fn span_ms(&self) -> f32 {
        self.timing.span_ms()
    }

    /// Group delay plus one cycle
    pub fn total_ms(&self) -> f32 {
        self.spec.delay_ms() + self.span_ms()
    }

    /// Write the from-state to every attached target
    pub fn render_from<H: LayoutHost + ?Sized>(&self, host: &mut H) {
        for &target in &self.targets {
            if host.is_attached(target) {
                self.spec.from_state().apply(host, target);
            }
        }
    }

    /// Render the batch at `time_ms` after the batch start, eased
    pub fn render_at<H: LayoutHost + ?Sized>(&self, host: &mut H, time_ms: f32) {
        let easing = self.spec.easing();
        self.render_with(host, |timing, i| {
            easing.apply(timing.local_progress(i, time_ms))
        });
    }

    /// Render the batch at linear scrub progress `progress`
    pub fn render_scrubbed<H: LayoutHost + ?Sized>(&self, host: &mut H, progress: f32) {
        self.render_with(host, |timing, i| timing.scrub_local(i, progress));
    }

    fn render_with<H, F>(&self, host: &mut H, local: F)
    where
        H: LayoutHost + ?Sized,
        F: Fn(&BatchTiming, usize) -> f32,
    {
        for (i, &target) in self.targets.iter().enumerate() {
            if !host.is_attached(target) {
                trace!(?target, "skipping unattached target");
                continue;
            }
            let t = local(&self.timing, i);
            self.spec.sample(t).apply(host, target);
        }
    }
}

/// Direction of timed playback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Time- or progress-driven player for one [`Tween`]
#[derive(Clone, Debug)]
pub struct TweenPlayer {
    tween: Tween,
    /// Position within the current cycle, 0..=span
    playhead_ms: f32,
    delay_remaining_ms: f32,
    direction: Option<Direction>,
    cycles_completed: u32,
    /// Set during the backward half of a yoyo cycle
    mirrored: bool,
    finished: bool,
}

impl TweenPlayer {
    pub fn new(tween: Tween) -> Self {
        Self {
            tween,
            playhead_ms: 0.0,
            delay_remaining_ms: 0.0,
            direction: None,
            cycles_completed: 0,
            mirrored: false,
            finished: false,
        }
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    /// Current playback direction, `None` when paused or finished
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.direction.is_some()
    }

    /// Forward playback ran to the end of its last cycle
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    /// Position within the current cycle as a fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        let span = self.tween.span_ms();
        if span <= 0.0 {
            return if self.finished { 1.0 } else { 0.0 };
        }
        (self.playhead_ms / span).clamp(0.0, 1.0)
    }

    /// Render the from-state without starting playback
    pub fn render_from<H: LayoutHost + ?Sized>(&self, host: &mut H) {
        self.tween.render_from(host);
    }

    /// Start or continue forward playback
    ///
    /// No-op while already playing forward or once finished. The group delay
    /// only applies when starting from the very beginning.
    pub fn play(&mut self) {
        if self.direction == Some(Direction::Forward) || self.finished {
            return;
        }
        let at_start = self.playhead_ms <= 0.0 && self.cycles_completed == 0 && !self.mirrored;
        self.delay_remaining_ms = if at_start {
            self.tween.spec().delay_ms()
        } else {
            0.0
        };
        self.direction = Some(Direction::Forward);
    }

    /// Play backwards from the current position toward the start
    pub fn reverse(&mut self) {
        self.delay_remaining_ms = 0.0;
        self.finished = false;
        if self.playhead_ms <= 0.0 {
            self.direction = None;
            return;
        }
        self.direction = Some(Direction::Reverse);
    }

    /// Stop playback without moving the playhead
    pub fn pause(&mut self) {
        self.direction = None;
    }

    /// Return to the initial state and render the from-state
    pub fn reset<H: LayoutHost + ?Sized>(&mut self, host: &mut H) {
        self.playhead_ms = 0.0;
        self.delay_remaining_ms = 0.0;
        self.direction = None;
        self.cycles_completed = 0;
        self.mirrored = false;
        self.finished = false;
        self.tween.render_from(host);
    }

    /// Advance timed playback by `dt` seconds and render
    ///
    /// Returns `true` while playback still needs frames.
    pub fn tick<H: LayoutHost + ?Sized>(&mut self, dt: f32, host: &mut H) -> bool {
        let Some(direction) = self.direction else {
            return false;
        };
        let mut dt_ms = dt.max(0.0) * 1000.0;

        if self.delay_remaining_ms > 0.0 {
            let used = dt_ms.min(self.delay_remaining_ms);
            self.delay_remaining_ms -= used;
            dt_ms -= used;
            if self.delay_remaining_ms > 0.0 {
                return true;
            }
        }

        match direction {
            Direction::Forward => self.advance(dt_ms),
            Direction::Reverse => {
                self.playhead_ms -= dt_ms;
                if self.playhead_ms <= 0.0 {
                    self.playhead_ms = 0.0;
                    self.direction = None;
                }
            }
        }

        self.render(host);
        self.direction.is_some()
    }

    fn advance(&mut self, dt_ms: f32) {
        let span = self.tween.span_ms();
        let repeat = self.tween.spec().repeat();
        self.playhead_ms += dt_ms;

        while self.playhead_ms >= span {
            let completed = self.cycles_completed.saturating_add(1);
            if span <= 0.0 || !repeat.allows_cycle(completed) {
                self.cycles_completed = completed;
                self.playhead_ms = span;
                self.direction = None;
                self.finished = true;
                return;
            }
            self.cycles_completed = completed;
            if repeat.yoyo {
                self.mirrored = !self.mirrored;
            }
            self.playhead_ms -= span;
        }
    }

    fn render<H: LayoutHost + ?Sized>(&self, host: &mut H) {
        let span = self.tween.span_ms();
        let time = if self.mirrored {
            span - self.playhead_ms
        } else {
            self.playhead_ms
        };
        self.tween.render_at(host, time);
    }

    /// Jump to scrub progress `progress` and render linearly
    ///
    /// Stops any timed playback.
    pub fn seek_progress<H: LayoutHost + ?Sized>(&mut self, progress: f32, host: &mut H) {
        let progress = progress.clamp(0.0, 1.0);
        self.direction = None;
        self.delay_remaining_ms = 0.0;
        self.mirrored = false;
        self.playhead_ms = progress * self.tween.span_ms();
        self.finished = progress >= 1.0;
        self.tween.render_scrubbed(host, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::transition::{Repeat, RepeatCount};
    use crate::values::VisualState;
    use scrollwork_core::{Document, Property, Rect, Viewport};

    fn fade(duration_secs: f32) -> TransitionSpec {
        TransitionSpec::builder(
            VisualState::new().with(Property::Opacity, 0.0),
            VisualState::new().with(Property::Opacity, 1.0),
        )
        .duration_secs(duration_secs)
        .build()
        .unwrap()
    }

    fn doc_with(n: usize) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new(Viewport::new(1000.0, 800.0));
        let ids = (0..n)
            .map(|i| doc.insert(format!("el{i}"), Rect::new(0.0, 100.0 * i as f32, 100.0, 50.0)))
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_plays_forward_to_end() {
        let (mut doc, ids) = doc_with(1);
        let mut player = TweenPlayer::new(Tween::new(fade(1.0), ids.clone()));
        player.render_from(&mut doc);
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.0));

        player.play();
        assert!(player.tick(0.5, &mut doc));
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.5));
        assert!(!player.tick(0.6, &mut doc));
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(1.0));
        assert!(player.is_finished());
    }

    #[test]
    fn test_play_is_idempotent() {
        let (mut doc, ids) = doc_with(1);
        let mut player = TweenPlayer::new(Tween::new(fade(1.0), ids.clone()));
        player.play();
        player.tick(0.4, &mut doc);
        player.play();
        player.play();
        player.tick(0.1, &mut doc);
        assert!((player.progress() - 0.5).abs() < 1e-5);

        player.tick(1.0, &mut doc);
        let writes = doc.write_count();
        player.play();
        assert!(!player.tick(0.5, &mut doc));
        assert_eq!(doc.write_count(), writes);
    }

    #[test]
    fn test_delay_only_before_first_cycle() {
        let (mut doc, ids) = doc_with(1);
        let spec = TransitionSpec::builder(
            VisualState::new().with(Property::Opacity, 0.0),
            VisualState::new().with(Property::Opacity, 1.0),
        )
        .duration_secs(1.0)
        .delay_secs(0.5)
        .build()
        .unwrap();
        let mut player = TweenPlayer::new(Tween::new(spec, ids.clone()));
        player.play();
        assert!(player.tick(0.4, &mut doc));
        assert_eq!(doc.style(ids[0], Property::Opacity), None);
        player.tick(0.6, &mut doc);
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.5));

        player.reverse();
        player.tick(0.25, &mut doc);
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.25));
    }

    #[test]
    fn test_reverse_returns_to_start() {
        let (mut doc, ids) = doc_with(1);
        let mut player = TweenPlayer::new(Tween::new(fade(1.0), ids.clone()));
        player.play();
        player.tick(0.6, &mut doc);
        player.reverse();
        assert_eq!(player.direction(), Some(Direction::Reverse));
        assert!(!player.tick(1.0, &mut doc));
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.0));
        assert!(!player.is_finished());
    }

    #[test]
    fn test_stagger_starts_in_order() {
        let (mut doc, ids) = doc_with(3);
        let spec = TransitionSpec::builder(
            VisualState::new().with(Property::Opacity, 0.0),
            VisualState::new().with(Property::Opacity, 1.0),
        )
        .duration_secs(1.0)
        .stagger_secs(0.2)
        .build()
        .unwrap();
        let mut player = TweenPlayer::new(Tween::new(spec, ids.clone()));
        player.play();
        player.tick(0.3, &mut doc);

        let opacity: Vec<f32> = ids
            .iter()
            .map(|id| doc.resolved_style(*id, Property::Opacity))
            .collect();
        assert!(opacity[0] > opacity[1]);
        assert!(opacity[1] > 0.0);
        assert_eq!(opacity[2], 0.0);
    }

    #[test]
    fn test_easing_applied_to_timed_playback() {
        let (mut doc, ids) = doc_with(1);
        let spec = TransitionSpec::builder(
            VisualState::new().with(Property::Opacity, 0.0),
            VisualState::new().with(Property::Opacity, 1.0),
        )
        .duration_secs(1.0)
        .easing(Easing::QuadIn)
        .build()
        .unwrap();
        let mut player = TweenPlayer::new(Tween::new(spec, ids.clone()));
        player.play();
        player.tick(0.5, &mut doc);
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.25));
    }

    #[test]
    fn test_seek_progress_is_linear() {
        let (mut doc, ids) = doc_with(1);
        let spec = TransitionSpec::builder(
            VisualState::new().with(Property::TranslateY, 100.0),
            VisualState::new().with(Property::TranslateY, 0.0),
        )
        .easing(Easing::QuartOut)
        .build()
        .unwrap();
        let mut player = TweenPlayer::new(Tween::new(spec, ids.clone()));
        player.seek_progress(0.25, &mut doc);
        assert_eq!(doc.style(ids[0], Property::TranslateY), Some(75.0));
        player.seek_progress(0.0, &mut doc);
        assert_eq!(doc.style(ids[0], Property::TranslateY), Some(100.0));
    }

    #[test]
    fn test_infinite_yoyo_bounces() {
        let (mut doc, ids) = doc_with(1);
        let spec = TransitionSpec::builder(
            VisualState::new().with(Property::TranslateY, 0.0),
            VisualState::new().with(Property::TranslateY, -20.0),
        )
        .duration_secs(2.0)
        .repeat(Repeat::infinite_yoyo())
        .build()
        .unwrap();
        let mut player = TweenPlayer::new(Tween::new(spec, ids.clone()));
        player.play();

        player.tick(2.0, &mut doc);
        assert_eq!(player.cycles_completed(), 1);
        player.tick(1.0, &mut doc);
        assert_eq!(doc.style(ids[0], Property::TranslateY), Some(-10.0));
        player.tick(1.0, &mut doc);
        assert_eq!(doc.style(ids[0], Property::TranslateY), Some(0.0));

        for _ in 0..100 {
            assert!(player.tick(0.7, &mut doc));
        }
        assert!(!player.is_finished());
    }

    #[test]
    fn test_finite_repeat_stops() {
        let (mut doc, ids) = doc_with(1);
        let spec = TransitionSpec::builder(
            VisualState::new().with(Property::Opacity, 0.0),
            VisualState::new().with(Property::Opacity, 1.0),
        )
        .duration_secs(1.0)
        .repeat(Repeat {
            count: RepeatCount::Finite(1),
            yoyo: false,
        })
        .build()
        .unwrap();
        let mut player = TweenPlayer::new(Tween::new(spec, ids.clone()));
        player.play();
        assert!(player.tick(1.5, &mut doc));
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.5));
        assert!(!player.tick(1.0, &mut doc));
        assert_eq!(player.cycles_completed(), 2);
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(1.0));
    }

    #[test]
    fn test_unattached_targets_skipped() {
        let (mut doc, ids) = doc_with(2);
        doc.detach(ids[1]);
        let mut player = TweenPlayer::new(Tween::new(fade(0.5), ids.clone()));
        player.render_from(&mut doc);
        player.play();
        player.tick(1.0, &mut doc);
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(1.0));
        assert_eq!(doc.style(ids[1], Property::Opacity), None);
    }

    #[test]
    fn test_reset_renders_from() {
        let (mut doc, ids) = doc_with(1);
        let mut player = TweenPlayer::new(Tween::new(fade(0.5), ids.clone()));
        player.play();
        player.tick(1.0, &mut doc);
        player.reset(&mut doc);
        assert!(!player.is_finished());
        assert_eq!(doc.style(ids[0], Property::Opacity), Some(0.0));
        player.play();
        assert!(player.is_playing());
    }
}
