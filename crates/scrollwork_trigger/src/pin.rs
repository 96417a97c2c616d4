//! Scroll-to-progress remapping for pinned horizontal strips
//!
//! A pinned section stays fixed on screen while vertical scroll inside its
//! window drives a horizontal strip from `0` to `-W`, where `W` is the strip's
//! horizontal overflow. The window starts when the section's top reaches the
//! viewport top and is exactly `W` long, so vertical scroll maps 1:1 onto
//! horizontal travel.
//!
//! Two properties are written:
//!
//! - `PinOffset` on the section: how far it has been held back, `W * progress`
//! - `TranslateX` on the strip: `-W * progress`
//!
//! `W` is re-measured synchronously on every refresh. With `W <= 0` there is
//! nothing to scroll and the pin never writes; if a previously active pin
//! loses its overflow, both properties are reset to 0.

use scrollwork_core::{ElementId, LayoutHost, Property};
use tracing::debug;

use crate::position::{Anchor, TriggerEnd, TriggerPosition};
use crate::trigger::{Scrub, TriggerSpec};

/// A pinned section with a horizontally scrolling strip
#[derive(Clone, Debug)]
pub struct PinSequence {
    section: ElementId,
    strip: ElementId,
    /// Cached horizontal overflow of the strip
    scrollable_width: f32,
    pinned: bool,
    /// Last written values, to avoid redundant writes
    written_offset: Option<f32>,
    written_translate: Option<f32>,
}

impl PinSequence {
    pub fn new(section: ElementId, strip: ElementId) -> Self {
        Self {
            section,
            strip,
            scrollable_width: 0.0,
            pinned: false,
            written_offset: None,
            written_translate: None,
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn strip(&self) -> ElementId {
        self.strip
    }

    /// Trigger for this pin's window: section top at viewport top, for `W` px
    pub fn trigger(&self, scrub: Scrub) -> TriggerSpec {
        TriggerSpec::new(
            self.section,
            TriggerPosition::new(Anchor::TOP, Anchor::TOP),
            TriggerEnd::AfterScrollWidth(self.strip),
        )
        .scrub(scrub)
    }

    pub fn scrollable_width(&self) -> f32 {
        self.scrollable_width
    }

    /// Whether there is anything to scroll
    pub fn is_active(&self) -> bool {
        self.scrollable_width > 0.0
    }

    /// Whether the section is currently held in place
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Extra document height the pin occupies
    pub fn spacing(&self) -> f32 {
        self.scrollable_width.max(0.0)
    }

    /// Re-measure `W` from the strip's current extent
    ///
    /// Returns `true` if the width changed.
    pub fn measure<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> bool {
        let width = host
            .scroll_extent(self.strip)
            .map(|extent| extent.overflow())
            .unwrap_or(0.0);
        let was_active = self.is_active();
        let changed = width != self.scrollable_width;
        self.scrollable_width = width;

        if changed {
            debug!(
                section = ?self.section,
                scrollable_width = width,
                "pin width measured"
            );
        }
        if was_active && !self.is_active() {
            debug!(section = ?self.section, "pin deactivated, strip reset");
            self.pinned = false;
            self.write_offset(host, 0.0);
            self.write_translate(host, 0.0);
        }
        changed
    }

    /// Hold the section according to window `progress`
    pub fn apply_pin<H: LayoutHost + ?Sized>(&mut self, host: &mut H, progress: f32) {
        if !self.is_active() {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        let pinned = progress > 0.0 && progress < 1.0;
        if pinned != self.pinned {
            debug!(section = ?self.section, pinned, progress, "pin state changed");
            self.pinned = pinned;
        }
        self.write_offset(host, self.scrollable_width * progress);
    }

    /// Translate the strip according to (possibly smoothed) `progress`
    pub fn apply_strip<H: LayoutHost + ?Sized>(&mut self, host: &mut H, progress: f32) {
        if !self.is_active() {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        let translate = if progress > 0.0 {
            -self.scrollable_width * progress
        } else {
            0.0
        };
        self.write_translate(host, translate);
    }

    /// Current strip translation for a given progress
    pub fn translation(&self, progress: f32) -> f32 {
        if !self.is_active() || progress <= 0.0 {
            return 0.0;
        }
        -self.scrollable_width * progress.min(1.0)
    }

    fn write_offset<H: LayoutHost + ?Sized>(&mut self, host: &mut H, value: f32) {
        if self.written_offset != Some(value) {
            host.write(self.section, Property::PinOffset, value);
            self.written_offset = Some(value);
        }
    }

    fn write_translate<H: LayoutHost + ?Sized>(&mut self, host: &mut H, value: f32) {
        if self.written_translate != Some(value) {
            host.write(self.strip, Property::TranslateX, value);
            self.written_translate = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_core::{Document, Rect, Viewport};

    fn setup(content_width: f32) -> (Document, PinSequence) {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let section = doc.insert("events", Rect::new(0.0, 1000.0, 1200.0, 800.0));
        let strip = doc.insert_scroll_container(
            "events-strip",
            Rect::new(0.0, 1100.0, 1200.0, 400.0),
            content_width,
        );
        (doc, PinSequence::new(section, strip))
    }

    #[test]
    fn test_measure() {
        let (mut doc, mut pin) = setup(3000.0);
        assert!(pin.measure(&mut doc));
        assert_eq!(pin.scrollable_width(), 1800.0);
        assert!(pin.is_active());
        assert_eq!(pin.spacing(), 1800.0);
        assert!(!pin.measure(&mut doc));
    }

    #[test]
    fn test_apply() {
        let (mut doc, mut pin) = setup(3000.0);
        pin.measure(&mut doc);

        pin.apply_pin(&mut doc, 0.5);
        pin.apply_strip(&mut doc, 0.5);
        assert!(pin.is_pinned());
        assert_eq!(doc.style(pin.section(), Property::PinOffset), Some(900.0));
        assert_eq!(doc.style(pin.strip(), Property::TranslateX), Some(-900.0));

        pin.apply_pin(&mut doc, 1.0);
        pin.apply_strip(&mut doc, 1.0);
        assert!(!pin.is_pinned());
        assert_eq!(doc.style(pin.strip(), Property::TranslateX), Some(-1800.0));

        pin.apply_pin(&mut doc, 0.0);
        pin.apply_strip(&mut doc, 0.0);
        assert_eq!(doc.style(pin.strip(), Property::TranslateX), Some(0.0));
        assert_eq!(doc.style(pin.section(), Property::PinOffset), Some(0.0));
    }

    #[test]
    fn test_degenerate_width_never_writes() {
        let (mut doc, mut pin) = setup(1000.0);
        pin.measure(&mut doc);
        assert!(!pin.is_active());
        assert_eq!(pin.spacing(), 0.0);

        for p in [0.0, 0.3, 1.0] {
            pin.apply_pin(&mut doc, p);
            pin.apply_strip(&mut doc, p);
        }
        assert_eq!(doc.write_count(), 0);
        assert_eq!(doc.resolved_style(pin.strip(), Property::TranslateX), 0.0);
    }

    #[test]
    fn test_width_loss_resets() {
        let (mut doc, mut pin) = setup(3000.0);
        pin.measure(&mut doc);
        pin.apply_pin(&mut doc, 0.5);
        pin.apply_strip(&mut doc, 0.5);

        doc.set_content_width(pin.strip(), 1200.0);
        pin.measure(&mut doc);
        assert!(!pin.is_active());
        assert!(!pin.is_pinned());
        assert_eq!(doc.style(pin.strip(), Property::TranslateX), Some(0.0));
        assert_eq!(doc.style(pin.section(), Property::PinOffset), Some(0.0));
    }

    #[test]
    fn test_trigger_window_matches_width() {
        let (mut doc, mut pin) = setup(3000.0);
        pin.measure(&mut doc);
        let window = pin.trigger(Scrub::Immediate).resolve(&doc).unwrap();
        assert_eq!(window.start(), 1000.0);
        assert_eq!(window.length(), pin.scrollable_width());
    }
}
