//! Contact: form and info panels slide in from opposite sides

use scrollwork_animation::{Easing, TransitionSpec};
use scrollwork_core::{Document, ElementId, LayoutHost, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, OwnerId, RegistryHandle};

use super::{rise, title_reveal, Mounter, Section};
use crate::error::Result;

pub struct Contact {
    section: ElementId,
    title: ElementId,
    form: ElementId,
    info: ElementId,
    handles: Vec<BindingHandle>,
}

impl Contact {
    pub fn new(doc: &mut Document) -> Self {
        Self {
            section: doc.insert("contact", Rect::ZERO),
            title: doc.insert("contact-title", Rect::ZERO),
            form: doc.insert("contact-form", Rect::ZERO),
            info: doc.insert("contact-info", Rect::ZERO),
            handles: Vec::new(),
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn info(&self) -> ElementId {
        self.info
    }
}

impl Section for Contact {
    fn owner(&self) -> OwnerId {
        OwnerId::new("contact")
    }

    fn height(&self, _viewport: Viewport) -> f32 {
        1000.0
    }

    fn place(&self, doc: &mut Document, top: f32) {
        let viewport = doc.viewport();
        let half = viewport.width / 2.0;
        doc.set_rect(self.section, Rect::new(0.0, top, viewport.width, self.height(viewport)));
        doc.set_rect(self.title, Rect::new(0.0, top + 96.0, viewport.width, 120.0));
        doc.set_rect(self.form, Rect::new(0.0, top + 280.0, half, 600.0));
        doc.set_rect(self.info, Rect::new(half, top + 280.0, half, 600.0));
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());
        let section = self.section;

        mounter.reveal(section, "top 80%", title_reveal()?, [self.title], "contact-title")?;
        for (target, offset, delay, label) in [
            (self.form, -50.0, 0.2, "contact-form"),
            (self.info, 50.0, 0.4, "contact-info"),
        ] {
            let (from, to) = rise(Property::TranslateX, offset);
            let spec = TransitionSpec::builder(from, to)
                .duration_secs(1.0)
                .delay_secs(delay)
                .easing(Easing::QuartOut)
                .build()?;
            mounter.reveal(section, "top 70%", spec, [target], label)?;
        }

        self.handles = mounter.finish();
        Ok(())
    }

    fn handles(&self) -> &[BindingHandle] {
        &self.handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_trigger::BindingRegistry;

    #[test]
    fn test_panels_slide_from_opposite_sides() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let mut contact = Contact::new(&mut doc);
        contact.place(&mut doc, 3000.0);
        let registry = BindingRegistry::new();
        contact.mount(&mut doc, &registry.handle()).unwrap();

        assert_eq!(doc.style(contact.form(), Property::TranslateX), Some(-50.0));
        assert_eq!(doc.style(contact.info(), Property::TranslateX), Some(50.0));

        registry.on_scroll(&mut doc, 2500.0);
        // Still inside the info panel's delay
        registry.tick(&mut doc, 0.3);
        assert_eq!(doc.style(contact.info(), Property::TranslateX), Some(50.0));

        while registry.tick(&mut doc, 1.0 / 60.0) {}
        assert_eq!(doc.style(contact.form(), Property::TranslateX), Some(0.0));
        assert_eq!(doc.style(contact.info(), Property::Opacity), Some(1.0));
    }
}
