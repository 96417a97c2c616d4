//! Viewport intersection tracker
//!
//! Observes trigger windows and reports each one's progress as the page
//! scrolls. Windows are resolved from layout when observed and re-resolved
//! on [`IntersectionTracker::refresh`]; scroll updates only re-sample.
//!
//! Observing a target that is not attached yields an inert handle, and
//! unobserving an inert or stale handle does nothing.

use scrollwork_core::{ElementId, LayoutHost};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::position::{TriggerEnd, TriggerPosition};
use crate::trigger::{Sample, TriggerEvent, TriggerSpec, TriggerWindow};

new_key_type! {
    /// Identifies one observed trigger window
    pub struct ObserverId;
}

/// Callback invoked for each window crossing
pub type EventListener = Box<dyn FnMut(TriggerEvent) + Send>;

/// Handle returned by [`IntersectionTracker::observe`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObserverHandle(Option<ObserverId>);

impl ObserverHandle {
    /// A handle that refers to nothing
    pub const fn inert() -> Self {
        Self(None)
    }

    pub fn id(&self) -> Option<ObserverId> {
        self.0
    }

    pub fn is_inert(&self) -> bool {
        self.0.is_none()
    }
}

/// Result of re-sampling one observer
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub observer: ObserverId,
    pub sample: Sample,
    pub previous: Sample,
    pub events: SmallVec<[TriggerEvent; 2]>,
}

struct Observer {
    spec: TriggerSpec,
    window: Option<TriggerWindow>,
    /// Last sample; starts before the window
    last: Sample,
    listener: Option<EventListener>,
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("target", &self.spec.target)
            .field("window", &self.window)
            .field("last", &self.last)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// Tracks progress of trigger windows against scroll position
#[derive(Debug, Default)]
pub struct IntersectionTracker {
    observers: SlotMap<ObserverId, Observer>,
}

impl IntersectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the window between `start` and `end` on `target`
    pub fn observe<H: LayoutHost + ?Sized>(
        &mut self,
        host: &H,
        target: ElementId,
        start: TriggerPosition,
        end: TriggerEnd,
    ) -> ObserverHandle {
        self.observe_spec(host, TriggerSpec::new(target, start, end))
    }

    /// Observe the window described by `spec`
    pub fn observe_spec<H: LayoutHost + ?Sized>(
        &mut self,
        host: &H,
        spec: TriggerSpec,
    ) -> ObserverHandle {
        let Some(window) = spec.resolve(host) else {
            debug!(target_id = ?spec.target, "observe skipped: target not attached");
            return ObserverHandle::inert();
        };
        let id = self.observers.insert(Observer {
            spec,
            window: Some(window),
            last: Sample::default(),
            listener: None,
        });
        trace!(observer = ?id, start = window.start(), end = window.end(), "observing");
        ObserverHandle(Some(id))
    }

    /// Stop observing; returns `false` for inert or stale handles
    pub fn unobserve(&mut self, handle: ObserverHandle) -> bool {
        match handle.0 {
            Some(id) => self.observers.remove(id).is_some(),
            None => false,
        }
    }

    /// Install a crossing listener
    pub fn set_listener(&mut self, handle: ObserverHandle, listener: EventListener) {
        if let Some(observer) = handle.0.and_then(|id| self.observers.get_mut(id)) {
            observer.listener = Some(listener);
        }
    }

    pub fn window(&self, handle: ObserverHandle) -> Option<TriggerWindow> {
        self.observers.get(handle.0?)?.window
    }

    /// Progress as of the last update
    pub fn progress(&self, handle: ObserverHandle) -> Option<f32> {
        self.observers.get(handle.0?).map(|o| o.last.progress)
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Drop every observer
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Re-resolve every window from current layout and viewport
    ///
    /// Observers whose target has been detached keep their last progress and
    /// are skipped by updates until the target returns.
    pub fn refresh<H: LayoutHost + ?Sized>(&mut self, host: &H) {
        for (id, observer) in self.observers.iter_mut() {
            observer.window = observer.spec.resolve(host);
            if observer.window.is_none() {
                trace!(observer = ?id, "target detached, window dropped");
            }
        }
    }

    /// Re-resolve one window
    pub fn refresh_one<H: LayoutHost + ?Sized>(&mut self, host: &H, handle: ObserverHandle) {
        if let Some(observer) = handle.0.and_then(|id| self.observers.get_mut(id)) {
            observer.window = observer.spec.resolve(host);
        }
    }

    /// Sample every observer at `scroll`
    pub fn update(&mut self, scroll: f32) -> Vec<Update> {
        let mut updates = Vec::with_capacity(self.observers.len());
        for (id, observer) in self.observers.iter_mut() {
            if let Some(update) = observer.sample_at(id, scroll) {
                updates.push(update);
            }
        }
        updates
    }

    /// Sample one observer at `scroll`
    pub fn update_one(&mut self, handle: ObserverHandle, scroll: f32) -> Option<Update> {
        let id = handle.0?;
        self.observers.get_mut(id)?.sample_at(id, scroll)
    }
}

impl Observer {
    fn sample_at(&mut self, id: ObserverId, scroll: f32) -> Option<Update> {
        let window = self.window?;
        let previous = self.last;
        let sample = window.sample(scroll);
        self.last = sample;

        let events: SmallVec<[TriggerEvent; 2]> = sample.events_since(&previous).collect();
        for &event in &events {
            debug!(observer = ?id, %event, progress = sample.progress, "trigger");
            if let Some(listener) = self.listener.as_mut() {
                listener(event);
            }
        }

        Some(Update {
            observer: id,
            sample,
            previous,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_core::{Document, Rect, Viewport};
    use std::sync::{Arc, Mutex};

    fn setup() -> (Document, ElementId) {
        let mut doc = Document::new(Viewport::new(1000.0, 1000.0));
        let section = doc.insert("section", Rect::new(0.0, 2000.0, 1000.0, 500.0));
        (doc, section)
    }

    #[test]
    fn test_observe_and_update() {
        let (doc, section) = setup();
        let mut tracker = IntersectionTracker::new();
        let handle = tracker.observe(
            &doc,
            section,
            "top 80%".parse().unwrap(),
            "bottom 20%".parse().unwrap(),
        );
        assert!(!handle.is_inert());

        let updates = tracker.update(1750.0);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].sample.progress, 0.5);
        assert_eq!(updates[0].events.as_slice(), &[TriggerEvent::Enter]);
        assert_eq!(tracker.progress(handle), Some(0.5));
    }

    #[test]
    fn test_unattached_target_gives_inert_handle() {
        let (mut doc, section) = setup();
        doc.detach(section);
        let mut tracker = IntersectionTracker::new();
        let handle = tracker.observe(
            &doc,
            section,
            "top 80%".parse().unwrap(),
            "bottom 20%".parse().unwrap(),
        );
        assert!(handle.is_inert());
        assert!(tracker.is_empty());
        assert!(!tracker.unobserve(handle));
        assert!(tracker.update(5000.0).is_empty());
    }

    #[test]
    fn test_unobserve_twice() {
        let (doc, section) = setup();
        let mut tracker = IntersectionTracker::new();
        let handle = tracker.observe(
            &doc,
            section,
            "top top".parse().unwrap(),
            TriggerEnd::After(100.0),
        );
        assert!(tracker.unobserve(handle));
        assert!(!tracker.unobserve(handle));
        assert_eq!(tracker.progress(handle), None);
    }

    #[test]
    fn test_refresh_rederives_on_resize() {
        let (mut doc, section) = setup();
        let mut tracker = IntersectionTracker::new();
        let handle = tracker.observe(
            &doc,
            section,
            "top 80%".parse().unwrap(),
            "bottom 20%".parse().unwrap(),
        );
        assert_eq!(tracker.window(handle).map(|w| w.start()), Some(1200.0));

        doc.set_viewport(Viewport::new(1000.0, 500.0));
        tracker.refresh(&doc);
        assert_eq!(tracker.window(handle).map(|w| w.start()), Some(1600.0));
    }

    #[test]
    fn test_listener_receives_events() {
        let (doc, section) = setup();
        let mut tracker = IntersectionTracker::new();
        let handle = tracker.observe(
            &doc,
            section,
            "top top".parse().unwrap(),
            TriggerEnd::After(100.0),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.set_listener(
            handle,
            Box::new(move |event| sink.lock().unwrap().push(event)),
        );

        tracker.update(2050.0);
        tracker.update(2200.0);
        tracker.update(0.0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                TriggerEvent::Enter,
                TriggerEvent::Leave,
                TriggerEvent::EnterBack,
                TriggerEvent::LeaveBack
            ]
        );
    }

    #[test]
    fn test_detached_observer_skipped() {
        let (mut doc, section) = setup();
        let mut tracker = IntersectionTracker::new();
        let handle = tracker.observe(
            &doc,
            section,
            "top top".parse().unwrap(),
            TriggerEnd::After(100.0),
        );
        doc.detach(section);
        tracker.refresh(&doc);
        assert!(tracker.update(2050.0).is_empty());
        assert_eq!(tracker.window(handle), None);
    }
}
