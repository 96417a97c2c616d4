//! Sponsors: logo and partner reveals plus per-logo floating loops

use scrollwork_animation::{Easing, Repeat, TransitionSpec, VisualState};
use scrollwork_core::{Document, ElementId, LayoutHost, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, BindingSpec, OwnerId, RegistryHandle};

use super::{insert_many, place_grid, rows, title_reveal, Mounter, Section};
use crate::error::Result;

const LOGO_COLUMNS: usize = 4;
const LOGO_ROW: f32 = 220.0;
const PARTNER_COLUMNS: usize = 2;
const PARTNER_ROW: f32 = 200.0;

pub struct Sponsors {
    section: ElementId,
    title: ElementId,
    logos: Vec<ElementId>,
    /// Icons inside each logo card; these float independently of the card reveal
    icons: Vec<ElementId>,
    partners: Vec<ElementId>,
    handles: Vec<BindingHandle>,
}

impl Sponsors {
    pub fn new(doc: &mut Document, logos: usize, partners: usize) -> Self {
        Self {
            section: doc.insert("sponsors", Rect::ZERO),
            title: doc.insert("sponsors-title", Rect::ZERO),
            logos: insert_many(doc, "sponsor-logo", logos),
            icons: insert_many(doc, "sponsor-icon", logos),
            partners: insert_many(doc, "partner", partners),
            handles: Vec::new(),
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn logos(&self) -> &[ElementId] {
        &self.logos
    }

    pub fn icons(&self) -> &[ElementId] {
        &self.icons
    }

    pub fn partners(&self) -> &[ElementId] {
        &self.partners
    }

    fn logos_height(&self) -> f32 {
        rows(self.logos.len(), LOGO_COLUMNS) * LOGO_ROW
    }

    /// Each icon bobs with a slightly longer period than the last
    fn float(index: usize) -> Result<TransitionSpec> {
        Ok(TransitionSpec::builder(
            VisualState::new().with(Property::TranslateY, 0.0),
            VisualState::new().with(Property::TranslateY, -10.0),
        )
        .duration_secs(2.0 + index as f32 * 0.2)
        .easing(Easing::QuadInOut)
        .repeat(Repeat::infinite_yoyo())
        .build()?)
    }
}

impl Section for Sponsors {
    fn owner(&self) -> OwnerId {
        OwnerId::new("sponsors")
    }

    fn height(&self, _viewport: Viewport) -> f32 {
        480.0 + self.logos_height() + rows(self.partners.len(), PARTNER_COLUMNS) * PARTNER_ROW
    }

    fn place(&self, doc: &mut Document, top: f32) {
        let viewport = doc.viewport();
        doc.set_rect(self.section, Rect::new(0.0, top, viewport.width, self.height(viewport)));
        doc.set_rect(self.title, Rect::new(0.0, top + 96.0, viewport.width, 120.0));

        let logos_top = top + 280.0;
        place_grid(doc, &self.logos, logos_top, viewport, LOGO_COLUMNS, LOGO_ROW);
        let cell = viewport.width / LOGO_COLUMNS as f32;
        for (i, &icon) in self.icons.iter().enumerate() {
            let row = (i / LOGO_COLUMNS) as f32;
            let col = (i % LOGO_COLUMNS) as f32;
            doc.set_rect(
                icon,
                Rect::new(col * cell + cell * 0.25, logos_top + row * LOGO_ROW + 24.0, cell * 0.5, 96.0),
            );
        }

        let partners_top = logos_top + self.logos_height() + 120.0;
        place_grid(doc, &self.partners, partners_top, viewport, PARTNER_COLUMNS, PARTNER_ROW);
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());
        let section = self.section;

        mounter.reveal(section, "top 80%", title_reveal()?, [self.title], "sponsors-title")?;

        let logos = TransitionSpec::builder(
            VisualState::new()
                .with(Property::TranslateY, 30.0)
                .with(Property::Opacity, 0.0)
                .with(Property::Scale, 0.8),
            VisualState::new()
                .with(Property::TranslateY, 0.0)
                .with(Property::Opacity, 1.0)
                .with(Property::Scale, 1.0),
        )
        .duration_secs(0.8)
        .stagger_secs(0.1)
        .easing(Easing::QuartOut)
        .build()?;
        mounter.reveal(section, "top 60%", logos, self.logos.iter().copied(), "sponsor-logos")?;

        let partners = TransitionSpec::builder(
            VisualState::new()
                .with(Property::TranslateY, 50.0)
                .with(Property::Opacity, 0.0)
                .with(Property::RotationY, 15.0),
            VisualState::new()
                .with(Property::TranslateY, 0.0)
                .with(Property::Opacity, 1.0)
                .with(Property::RotationY, 0.0),
        )
        .duration_secs(1.0)
        .stagger_secs(0.15)
        .easing(Easing::QuartOut)
        .build()?;
        mounter.reveal(section, "top 50%", partners, self.partners.iter().copied(), "partners")?;

        for (i, &icon) in self.icons.iter().enumerate() {
            let spec = BindingSpec::autoplay(Self::float(i)?, [icon]).named(format!("sponsor-float-{i}"));
            mounter.register(spec);
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
    fn test_float_periods() {
        assert_eq!(Sponsors::float(0).unwrap().duration_ms(), 2000.0);
        assert_eq!(Sponsors::float(5).unwrap().duration_ms(), 3000.0);
        assert!(Sponsors::float(3).unwrap().repeat().yoyo);
    }

    #[test]
    fn test_mount_and_release() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let mut sponsors = Sponsors::new(&mut doc, 8, 4);
        sponsors.place(&mut doc, 4000.0);
        let registry = BindingRegistry::new();
        sponsors.mount(&mut doc, &registry.handle()).unwrap();
        assert_eq!(registry.bindings_for("sponsors"), 11);

        // Floats start right away, reveals wait for scroll
        assert!(registry.tick(&mut doc, 0.5));
        assert!(doc.resolved_style(sponsors.icons()[0], Property::TranslateY) < 0.0);
        assert_eq!(doc.style(sponsors.logos()[0], Property::Opacity), Some(0.0));

        assert_eq!(sponsors.unmount(&registry.handle()), 11);
        let writes = doc.write_count();
        assert!(!registry.tick(&mut doc, 0.5));
        assert_eq!(doc.write_count(), writes);
    }
}
