//! Bindings: one trigger paired with one motion
//!
//! A [`BindingSpec`] is what a page section hands to the registry. The
//! registry turns it into a live binding that owns a tracker observer and the
//! player state for its motion. Bindings move through
//! `Unregistered → Active → Released` and never come back from `Released`.

use scrollwork_animation::{Spring, SpringConfig, Timeline, TransitionSpec, Tween, TweenPlayer};
use scrollwork_core::{ElementId, LayoutHost};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::pin::PinSequence;
use crate::tracker::{EventListener, IntersectionTracker, ObserverHandle};
use crate::trigger::{Sample, Scrub, TriggerEvent, TriggerSpec};

/// Lifecycle of a binding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingState {
    Unregistered,
    Active,
    Released,
}

/// What a binding animates
#[derive(Debug)]
pub enum MotionSpec {
    /// A transition over a batch of elements
    Tween {
        transition: TransitionSpec,
        targets: SmallVec<[ElementId; 4]>,
    },
    /// A sequenced intro, started on registration
    Timeline(Timeline),
    /// A pinned section driving a horizontal strip
    Pin { section: ElementId, strip: ElementId },
}

/// Everything needed to create a binding
pub struct BindingSpec {
    label: Option<String>,
    trigger: Option<TriggerSpec>,
    motion: MotionSpec,
    listener: Option<EventListener>,
}

impl std::fmt::Debug for BindingSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingSpec")
            .field("label", &self.label)
            .field("trigger", &self.trigger)
            .field("motion", &self.motion)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl BindingSpec {
    /// A transition driven by a scroll trigger
    pub fn triggered(
        trigger: TriggerSpec,
        transition: TransitionSpec,
        targets: impl IntoIterator<Item = ElementId>,
    ) -> Self {
        Self {
            label: None,
            trigger: Some(trigger),
            motion: MotionSpec::Tween {
                transition,
                targets: targets.into_iter().collect(),
            },
            listener: None,
        }
    }

    /// A transition that plays as soon as it is registered
    pub fn autoplay(
        transition: TransitionSpec,
        targets: impl IntoIterator<Item = ElementId>,
    ) -> Self {
        Self {
            label: None,
            trigger: None,
            motion: MotionSpec::Tween {
                transition,
                targets: targets.into_iter().collect(),
            },
            listener: None,
        }
    }

    /// A timeline that starts as soon as it is registered
    pub fn timeline(timeline: Timeline) -> Self {
        Self {
            label: None,
            trigger: None,
            motion: MotionSpec::Timeline(timeline),
            listener: None,
        }
    }

    /// Pin `section` while its vertical scroll drives `strip` horizontally
    pub fn pin(section: ElementId, strip: ElementId, scrub: Scrub) -> Self {
        let trigger = PinSequence::new(section, strip).trigger(scrub);
        Self {
            label: None,
            trigger: Some(trigger),
            motion: MotionSpec::Pin { section, strip },
            listener: None,
        }
    }

    /// Name used in log output
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Observe window crossings; purely informational
    pub fn on_event(mut self, listener: impl FnMut(TriggerEvent) + Send + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn trigger(&self) -> Option<&TriggerSpec> {
        self.trigger.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug)]
enum Motion {
    Tween(TweenPlayer),
    Timeline(Timeline),
    Pin(PinSequence),
}

/// A live binding, owned by the registry
#[derive(Debug)]
pub(crate) struct Binding {
    label: String,
    state: BindingState,
    trigger: Option<TriggerSpec>,
    observer: ObserverHandle,
    motion: Motion,
    /// One-shot bindings: forward playback has been started
    has_played_forward: bool,
    /// Scrubbed bindings: last progress applied to the motion
    current_progress: f32,
    /// Smoothed scrub follower
    smoother: Option<Spring>,
}

impl Binding {
    pub(crate) fn new(spec: BindingSpec) -> (Self, Option<EventListener>) {
        let motion = match spec.motion {
            MotionSpec::Tween {
                transition,
                targets,
            } => Motion::Tween(TweenPlayer::new(Tween::new(transition, targets))),
            MotionSpec::Timeline(timeline) => Motion::Timeline(timeline),
            MotionSpec::Pin { section, strip } => Motion::Pin(PinSequence::new(section, strip)),
        };
        let smoother = match spec.trigger.map(|t| t.scrub) {
            Some(Scrub::Smoothed { lag_secs }) => {
                Some(Spring::new(SpringConfig::lagged(lag_secs), 0.0))
            }
            _ => None,
        };
        let label = spec.label.unwrap_or_else(|| match &motion {
            Motion::Tween(_) => "tween".to_string(),
            Motion::Timeline(_) => "timeline".to_string(),
            Motion::Pin(_) => "pin".to_string(),
        });
        let binding = Self {
            label,
            state: BindingState::Unregistered,
            trigger: spec.trigger,
            observer: ObserverHandle::inert(),
            motion,
            has_played_forward: false,
            current_progress: 0.0,
            smoother,
        };
        (binding, spec.listener)
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn state(&self) -> BindingState {
        self.state
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state == BindingState::Active
    }

    pub(crate) fn observer(&self) -> ObserverHandle {
        self.observer
    }

    pub(crate) fn has_played_forward(&self) -> bool {
        self.has_played_forward
    }

    /// Progress of the motion as last applied
    pub(crate) fn progress(&self) -> f32 {
        match &self.motion {
            Motion::Tween(player) if self.trigger.map_or(true, |t| !t.scrub.is_scrubbed()) => {
                player.progress()
            }
            Motion::Timeline(timeline) if timeline.duration_ms() > 0.0 => {
                timeline.elapsed_ms() / timeline.duration_ms()
            }
            Motion::Timeline(_) => 1.0,
            _ => self.current_progress,
        }
    }

    pub(crate) fn pin(&self) -> Option<&PinSequence> {
        match &self.motion {
            Motion::Pin(pin) => Some(pin),
            _ => None,
        }
    }

    /// Render initial state, start observing, and start autoplay motions
    ///
    /// Returns `true` if the binding wants a frame.
    pub(crate) fn activate<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        tracker: &mut IntersectionTracker,
        listener: Option<EventListener>,
    ) -> bool {
        if self.state != BindingState::Unregistered {
            return false;
        }
        self.state = BindingState::Active;

        if let Motion::Pin(pin) = &mut self.motion {
            pin.measure(host);
        }
        if let Some(trigger) = self.trigger {
            self.observer = tracker.observe_spec(&*host, trigger);
            if let Some(listener) = listener {
                tracker.set_listener(self.observer, listener);
            }
        }

        let autoplay = self.trigger.is_none();
        match &mut self.motion {
            Motion::Tween(player) => {
                player.render_from(host);
                if autoplay {
                    player.play();
                    return true;
                }
                false
            }
            Motion::Timeline(timeline) => {
                timeline.start(host);
                timeline.is_playing()
            }
            Motion::Pin(_) => false,
        }
    }

    /// Apply a new tracker sample; returns `true` if a frame is needed
    pub(crate) fn on_sample<H: LayoutHost + ?Sized>(&mut self, host: &mut H, sample: &Sample) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(trigger) = self.trigger else {
            return false;
        };
        let progress = sample.progress;

        match (&mut self.motion, trigger.scrub) {
            (Motion::Tween(player), Scrub::Off) => {
                if sample.past_start && !self.has_played_forward {
                    debug!(binding = %self.label, "one-shot play");
                    self.has_played_forward = true;
                    player.play();
                    return true;
                }
                if trigger.reversible && !sample.past_start && self.has_played_forward {
                    debug!(binding = %self.label, "one-shot reverse");
                    self.has_played_forward = false;
                    player.reverse();
                    return player.is_playing();
                }
                false
            }
            (Motion::Tween(player), Scrub::Immediate) => {
                self.current_progress = progress;
                player.seek_progress(progress, host);
                false
            }
            (Motion::Pin(pin), Scrub::Off | Scrub::Immediate) => {
                self.current_progress = progress;
                pin.apply_pin(host, progress);
                pin.apply_strip(host, progress);
                false
            }
            (Motion::Pin(pin), Scrub::Smoothed { .. }) => {
                pin.apply_pin(host, progress);
                chase(&mut self.smoother, progress)
            }
            (_, Scrub::Smoothed { .. }) => chase(&mut self.smoother, progress),
            (Motion::Timeline(_), _) => false,
        }
    }

    /// Advance one frame; returns `true` if another frame is needed
    pub(crate) fn tick<H: LayoutHost + ?Sized>(&mut self, host: &mut H, dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        if let Some(spring) = self.smoother.as_mut() {
            spring.step(dt);
            self.current_progress = spring.value();
            let settled = spring.is_settled();
            match &mut self.motion {
                Motion::Tween(player) => player.seek_progress(self.current_progress, host),
                Motion::Pin(pin) => pin.apply_strip(host, self.current_progress),
                Motion::Timeline(_) => {}
            }
            return !settled;
        }
        match &mut self.motion {
            Motion::Tween(player) => player.tick(dt, host),
            Motion::Timeline(timeline) => timeline.tick(dt, host),
            Motion::Pin(_) => false,
        }
    }

    /// Re-measure layout-derived state and re-resolve the trigger window
    pub(crate) fn refresh<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        tracker: &mut IntersectionTracker,
    ) {
        if !self.is_active() {
            return;
        }
        if let Motion::Pin(pin) = &mut self.motion {
            if pin.measure(host) {
                if pin.is_active() {
                    // A settled smoother never ticks again, so the strip
                    // has to follow the new width right here
                    pin.apply_strip(host, self.current_progress);
                } else {
                    self.current_progress = 0.0;
                    if let Some(spring) = self.smoother.as_mut() {
                        spring.snap(0.0);
                    }
                }
            }
        }
        tracker.refresh_one(&*host, self.observer);
    }

    /// Return to the initial state so a one-shot can play again
    pub(crate) fn reset<H: LayoutHost + ?Sized>(&mut self, host: &mut H) {
        if !self.is_active() {
            return;
        }
        trace!(binding = %self.label, "reset");
        self.has_played_forward = false;
        self.current_progress = 0.0;
        if let Some(spring) = self.smoother.as_mut() {
            spring.snap(0.0);
        }
        match &mut self.motion {
            Motion::Tween(player) => player.reset(host),
            Motion::Timeline(timeline) => timeline.start(host),
            Motion::Pin(pin) => {
                pin.apply_pin(host, 0.0);
                pin.apply_strip(host, 0.0);
            }
        }
    }

    /// Stop observing and stop all playback
    pub(crate) fn release(&mut self, tracker: &mut IntersectionTracker) {
        if self.state == BindingState::Released {
            return;
        }
        tracker.unobserve(self.observer);
        self.observer = ObserverHandle::inert();
        match &mut self.motion {
            Motion::Tween(player) => player.pause(),
            Motion::Timeline(timeline) => timeline.stop(),
            Motion::Pin(_) => {}
        }
        self.state = BindingState::Released;
        debug!(binding = %self.label, "released");
    }
}

/// Retarget a smoothed scrub; returns `true` while it still has to move
fn chase(smoother: &mut Option<Spring>, progress: f32) -> bool {
    match smoother.as_mut() {
        Some(spring) => {
            spring.set_target(progress);
            !spring.is_settled()
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_animation::VisualState;
    use scrollwork_core::{Document, Property, Rect, Viewport};

    fn fade() -> TransitionSpec {
        TransitionSpec::builder(
            VisualState::new().with(Property::Opacity, 0.0),
            VisualState::new().with(Property::Opacity, 1.0),
        )
        .duration_secs(1.0)
        .build()
        .unwrap()
    }

    fn setup() -> (Document, ElementId) {
        let mut doc = Document::new(Viewport::new(1000.0, 1000.0));
        let el = doc.insert("card", Rect::new(0.0, 2000.0, 1000.0, 500.0));
        (doc, el)
    }

    #[test]
    fn test_activate_renders_from_state() {
        let (mut doc, el) = setup();
        let mut tracker = IntersectionTracker::new();
        let trigger = TriggerSpec::parse(el, "top 80%", "bottom 20%").unwrap();
        let (mut binding, listener) = Binding::new(BindingSpec::triggered(trigger, fade(), [el]));
        assert_eq!(binding.state(), BindingState::Unregistered);

        assert!(!binding.activate(&mut doc, &mut tracker, listener));
        assert_eq!(binding.state(), BindingState::Active);
        assert_eq!(doc.style(el, Property::Opacity), Some(0.0));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_one_shot_plays_once() {
        let (mut doc, el) = setup();
        let mut tracker = IntersectionTracker::new();
        let trigger = TriggerSpec::parse(el, "top 80%", "bottom 20%").unwrap();
        let (mut binding, listener) = Binding::new(BindingSpec::triggered(trigger, fade(), [el]));
        binding.activate(&mut doc, &mut tracker, listener);

        let inside = Sample {
            progress: 0.2,
            past_start: true,
            past_end: false,
        };
        assert!(binding.on_sample(&mut doc, &inside));
        assert!(!binding.on_sample(&mut doc, &inside));
        assert!(binding.has_played_forward());
    }

    #[test]
    fn test_release_stops_everything() {
        let (mut doc, el) = setup();
        let mut tracker = IntersectionTracker::new();
        let trigger = TriggerSpec::parse(el, "top 80%", "bottom 20%")
            .unwrap()
            .scrub(Scrub::Immediate);
        let (mut binding, listener) = Binding::new(BindingSpec::triggered(trigger, fade(), [el]));
        binding.activate(&mut doc, &mut tracker, listener);
        binding.release(&mut tracker);

        assert_eq!(binding.state(), BindingState::Released);
        assert!(tracker.is_empty());
        let writes = doc.write_count();
        let sample = Sample {
            progress: 0.5,
            past_start: true,
            past_end: false,
        };
        assert!(!binding.on_sample(&mut doc, &sample));
        assert!(!binding.tick(&mut doc, 0.1));
        binding.reset(&mut doc);
        assert_eq!(doc.write_count(), writes);
    }

    #[test]
    fn test_autoplay_requests_frame() {
        let (mut doc, el) = setup();
        let mut tracker = IntersectionTracker::new();
        let (mut binding, listener) = Binding::new(BindingSpec::autoplay(fade(), [el]).named("float"));
        assert_eq!(binding.label(), "float");
        assert!(binding.activate(&mut doc, &mut tracker, listener));
        assert!(tracker.is_empty());
        assert!(binding.tick(&mut doc, 0.5));
        assert_eq!(doc.style(el, Property::Opacity), Some(0.5));
    }
}
