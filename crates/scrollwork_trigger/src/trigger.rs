//! Trigger specifications and resolved windows
//!
//! A [`TriggerSpec`] is declarative: target element, start and end
//! positions, scrub mode. Resolving it against the host yields a
//! [`TriggerWindow`], the scroll range over which progress runs 0 → 1.
//! Windows are re-resolved whenever layout or viewport size changes.

use std::fmt;

use scrollwork_core::{ElementId, LayoutHost};

use crate::error::{Result, TriggerError};
use crate::position::{TriggerEnd, TriggerPosition};

/// How progress drives a binding's motion
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Scrub {
    /// Play the transition once when the window is entered
    #[default]
    Off,
    /// Apply progress directly on every scroll update
    Immediate,
    /// Chase progress with a spring that catches up in about `lag_secs`
    Smoothed { lag_secs: f32 },
}

impl Scrub {
    /// Smoothed scrub with validation
    pub fn smoothed(lag_secs: f32) -> Result<Self> {
        if lag_secs.is_finite() && lag_secs > 0.0 {
            Ok(Scrub::Smoothed { lag_secs })
        } else {
            Err(TriggerError::InvalidLag(lag_secs))
        }
    }

    pub fn is_scrubbed(&self) -> bool {
        !matches!(self, Scrub::Off)
    }
}

/// Declarative trigger
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSpec {
    pub target: ElementId,
    pub start: TriggerPosition,
    pub end: TriggerEnd,
    pub scrub: Scrub,
    /// One-shot only: reverse the transition when scrolling back above start
    pub reversible: bool,
}

impl TriggerSpec {
    pub fn new(target: ElementId, start: TriggerPosition, end: TriggerEnd) -> Self {
        Self {
            target,
            start,
            end,
            scrub: Scrub::Off,
            reversible: false,
        }
    }

    /// Build from position strings such as `"top 80%"` and `"bottom 20%"`
    pub fn parse(target: ElementId, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(target, start.parse()?, end.parse()?))
    }

    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    /// Resolve against current layout; `None` if the target is not attached
    pub fn resolve<H: LayoutHost + ?Sized>(&self, host: &H) -> Option<TriggerWindow> {
        let bounds = host.bounds(self.target)?;
        let viewport = host.viewport();
        let start = self.start.scroll_offset(bounds, viewport);
        let end = match self.end {
            TriggerEnd::At(position) => position.scroll_offset(bounds, viewport),
            TriggerEnd::After(distance) => start + distance,
            TriggerEnd::AfterScrollWidth(container) => {
                let overflow = host
                    .scroll_extent(container)
                    .map(|extent| extent.overflow())
                    .unwrap_or(0.0);
                start + overflow.max(0.0)
            }
        };
        Some(TriggerWindow::new(start, end))
    }
}

/// A resolved scroll range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerWindow {
    start: f32,
    end: f32,
}

impl TriggerWindow {
    /// An end before the start collapses the window onto the start
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Progress at scroll position `scroll`, clamped to [0, 1]
    ///
    /// A zero-length window is a step at its start.
    pub fn progress(&self, scroll: f32) -> f32 {
        let length = self.length();
        if length <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / length).clamp(0.0, 1.0)
    }

    /// Sample the window at `scroll`
    pub fn sample(&self, scroll: f32) -> Sample {
        Sample {
            progress: self.progress(scroll),
            past_start: scroll >= self.start,
            past_end: scroll >= self.end,
        }
    }
}

/// Progress and window position at one scroll offset
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    pub progress: f32,
    pub past_start: bool,
    pub past_end: bool,
}

impl Sample {
    /// Crossings between `previous` and `self`, in the order they happen
    pub fn events_since(&self, previous: &Sample) -> impl Iterator<Item = TriggerEvent> {
        let forward = [
            (!previous.past_start && self.past_start, TriggerEvent::Enter),
            (!previous.past_end && self.past_end, TriggerEvent::Leave),
        ];
        let backward = [
            (previous.past_end && !self.past_end, TriggerEvent::EnterBack),
            (previous.past_start && !self.past_start, TriggerEvent::LeaveBack),
        ];
        forward
            .into_iter()
            .chain(backward)
            .filter_map(|(crossed, event)| crossed.then_some(event))
    }
}

/// Window boundary crossing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerEvent {
    /// Scrolled down past the start
    Enter,
    /// Scrolled down past the end
    Leave,
    /// Scrolled back up above the end
    EnterBack,
    /// Scrolled back up above the start
    LeaveBack,
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriggerEvent::Enter => "enter",
            TriggerEvent::Leave => "leave",
            TriggerEvent::EnterBack => "enter-back",
            TriggerEvent::LeaveBack => "leave-back",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_core::{Document, Rect, Viewport};

    #[test]
    fn test_progress_clamped_and_linear() {
        let window = TriggerWindow::new(100.0, 300.0);
        assert_eq!(window.progress(0.0), 0.0);
        assert_eq!(window.progress(100.0), 0.0);
        assert_eq!(window.progress(200.0), 0.5);
        assert_eq!(window.progress(300.0), 1.0);
        assert_eq!(window.progress(10_000.0), 1.0);
    }

    #[test]
    fn test_degenerate_window_is_step() {
        let window = TriggerWindow::new(500.0, 400.0);
        assert_eq!(window.end(), 500.0);
        assert_eq!(window.progress(499.0), 0.0);
        assert_eq!(window.progress(500.0), 1.0);
    }

    #[test]
    fn test_events_forward_and_back() {
        let window = TriggerWindow::new(100.0, 300.0);
        let before = window.sample(0.0);
        let inside = window.sample(200.0);
        let after = window.sample(400.0);

        assert_eq!(inside.events_since(&before).collect::<Vec<_>>(), vec![TriggerEvent::Enter]);
        assert_eq!(after.events_since(&inside).collect::<Vec<_>>(), vec![TriggerEvent::Leave]);
        assert_eq!(
            inside.events_since(&after).collect::<Vec<_>>(),
            vec![TriggerEvent::EnterBack]
        );
        assert_eq!(
            before.events_since(&inside).collect::<Vec<_>>(),
            vec![TriggerEvent::LeaveBack]
        );
        assert_eq!(
            after.events_since(&before).collect::<Vec<_>>(),
            vec![TriggerEvent::Enter, TriggerEvent::Leave]
        );
        assert_eq!(inside.events_since(&inside).count(), 0);
    }

    #[test]
    fn test_resolve_against_document() {
        let mut doc = Document::new(Viewport::new(1000.0, 1000.0));
        let section = doc.insert("about", Rect::new(0.0, 2000.0, 1000.0, 500.0));
        let spec = TriggerSpec::parse(section, "top 80%", "bottom 20%").unwrap();

        let window = spec.resolve(&doc).unwrap();
        assert_eq!(window.start(), 1200.0);
        assert_eq!(window.end(), 2300.0);

        doc.detach(section);
        assert!(spec.resolve(&doc).is_none());
    }

    #[test]
    fn test_resolve_scroll_width_end() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let section = doc.insert("events", Rect::new(0.0, 1000.0, 1200.0, 800.0));
        let strip =
            doc.insert_scroll_container("strip", Rect::new(0.0, 1100.0, 1200.0, 400.0), 3000.0);
        let spec = TriggerSpec::new(
            section,
            "top top".parse().unwrap(),
            TriggerEnd::AfterScrollWidth(strip),
        );

        let window = spec.resolve(&doc).unwrap();
        assert_eq!((window.start(), window.end()), (1000.0, 2800.0));

        doc.set_content_width(strip, 1000.0);
        let window = spec.resolve(&doc).unwrap();
        assert_eq!(window.length(), 0.0);
    }

    #[test]
    fn test_smoothed_validation() {
        assert_eq!(Scrub::smoothed(1.0), Ok(Scrub::Smoothed { lag_secs: 1.0 }));
        assert_eq!(Scrub::smoothed(0.0), Err(TriggerError::InvalidLag(0.0)));
        assert!(Scrub::Immediate.is_scrubbed());
        assert!(!Scrub::Off.is_scrubbed());
    }
}
