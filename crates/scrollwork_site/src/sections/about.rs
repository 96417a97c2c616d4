//! About: staggered reveals at successively deeper trigger lines

use scrollwork_animation::{Easing, TransitionSpec, VisualState};
use scrollwork_core::{Document, ElementId, LayoutHost, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, OwnerId, RegistryHandle};

use super::{insert_many, place_grid, rise, rows, title_reveal, Mounter, Section};
use crate::error::Result;

const COLUMNS: usize = 4;
const CARD_ROW: f32 = 360.0;

pub struct About {
    section: ElementId,
    title: ElementId,
    content: ElementId,
    stats: ElementId,
    cards: Vec<ElementId>,
    handles: Vec<BindingHandle>,
}

impl About {
    pub fn new(doc: &mut Document, cards: usize) -> Self {
        Self {
            section: doc.insert("about", Rect::ZERO),
            title: doc.insert("about-title", Rect::ZERO),
            content: doc.insert("about-content", Rect::ZERO),
            stats: doc.insert("about-stats", Rect::ZERO),
            cards: insert_many(doc, "about-card", cards),
            handles: Vec::new(),
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn title(&self) -> ElementId {
        self.title
    }

    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }
}

impl Section for About {
    fn owner(&self) -> OwnerId {
        OwnerId::new("about")
    }

    fn height(&self, _viewport: Viewport) -> f32 {
        760.0 + rows(self.cards.len(), COLUMNS) * CARD_ROW
    }

    fn place(&self, doc: &mut Document, top: f32) {
        let viewport = doc.viewport();
        let width = viewport.width;
        doc.set_rect(self.section, Rect::new(0.0, top, width, self.height(viewport)));
        doc.set_rect(self.title, Rect::new(0.0, top + 96.0, width, 120.0));
        doc.set_rect(self.content, Rect::new(0.0, top + 260.0, width * 0.5, 320.0));
        doc.set_rect(self.stats, Rect::new(width * 0.5, top + 260.0, width * 0.5, 320.0));
        place_grid(doc, &self.cards, top + 660.0, viewport, COLUMNS, CARD_ROW);
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());
        let section = self.section;

        mounter.reveal(section, "top 80%", title_reveal()?, [self.title], "about-title")?;

        for (target, start, delay, label) in [
            (self.content, "top 70%", 0.2, "about-content"),
            (self.stats, "top 60%", 0.4, "about-stats"),
        ] {
            let (from, to) = rise(Property::TranslateY, 30.0);
            let spec = TransitionSpec::builder(from, to)
                .duration_secs(1.0)
                .delay_secs(delay)
                .easing(Easing::QuartOut)
                .build()?;
            mounter.reveal(section, start, spec, [target], label)?;
        }

        let cards = TransitionSpec::builder(
            VisualState::new()
                .with(Property::TranslateY, 50.0)
                .with(Property::Opacity, 0.0)
                .with(Property::Scale, 0.9),
            VisualState::new()
                .with(Property::TranslateY, 0.0)
                .with(Property::Opacity, 1.0)
                .with(Property::Scale, 1.0),
        )
        .duration_secs(0.8)
        .stagger_secs(0.2)
        .easing(Easing::QuartOut)
        .build()?;
        mounter.reveal(section, "top 50%", cards, self.cards.iter().copied(), "about-cards")?;

        self.handles = mounter.finish();
        Ok(())
    }

    fn handles(&self) -> &[BindingHandle] {
        &self.handles
    }
}
