//! Events: pinned section with a horizontally scrolling card strip

use scrollwork_core::{Document, ElementId, LayoutHost, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, BindingSpec, OwnerId, RegistryHandle, Scrub};
use tracing::{debug, warn};

use super::{title_reveal, Mounter, Section};
use crate::config::ContentConfig;
use crate::error::Result;

/// Lag of the smoothed strip, in seconds
const STRIP_LAG_SECS: f32 = 1.0;

pub struct Events {
    section: ElementId,
    title: ElementId,
    strip: ElementId,
    pin: Option<BindingHandle>,
    handles: Vec<BindingHandle>,
}

impl Events {
    pub fn new(doc: &mut Document, content: &ContentConfig) -> Self {
        Self {
            section: doc.insert("events", Rect::ZERO),
            title: doc.insert("events-title", Rect::ZERO),
            strip: doc.insert_scroll_container("events-strip", Rect::ZERO, content.event_strip_width()),
            pin: None,
            handles: Vec::new(),
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn title(&self) -> ElementId {
        self.title
    }

    pub fn strip(&self) -> ElementId {
        self.strip
    }

    /// The pin binding, once mounted
    pub fn pin(&self) -> Option<&BindingHandle> {
        self.pin.as_ref()
    }
}

impl Section for Events {
    fn owner(&self) -> OwnerId {
        OwnerId::new("events")
    }

    fn height(&self, viewport: Viewport) -> f32 {
        viewport.height
    }

    fn place(&self, doc: &mut Document, top: f32) {
        let viewport = doc.viewport();
        doc.set_rect(self.section, Rect::new(0.0, top, viewport.width, viewport.height));
        doc.set_rect(self.title, Rect::new(0.0, top + 80.0, viewport.width, 120.0));
        doc.set_rect(
            self.strip,
            Rect::new(0.0, top + 240.0, viewport.width, (viewport.height - 280.0).max(0.0)),
        );
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());
        mounter.reveal(self.section, "top 80%", title_reveal()?, [self.title], "events-title")?;

        let pin = BindingSpec::pin(self.section, self.strip, Scrub::smoothed(STRIP_LAG_SECS)?)
            .named("events-strip")
            .on_event(|event| debug!(%event, "events strip"));
        let pin = mounter.register(pin);
        if pin.pin_spacing().unwrap_or(0.0) <= 0.0 {
            warn!("events strip fits its container, no horizontal scroll needed");
        }
        self.pin = Some(pin);

        self.handles = mounter.finish();
        Ok(())
    }

    fn handles(&self) -> &[BindingHandle] {
        &self.handles
    }

    fn unmount(&mut self, registry: &RegistryHandle) -> usize {
        self.pin = None;
        registry.release_all(self.owner())
    }

    /// The pin holds the section for `W` px of scroll
    fn pin_spacing(&self, doc: &Document) -> f32 {
        if !self.pin.as_ref().is_some_and(BindingHandle::is_active) {
            return 0.0;
        }
        doc.scroll_extent(self.strip)
            .map(|extent| extent.overflow().max(0.0))
            .unwrap_or(0.0)
    }
}
