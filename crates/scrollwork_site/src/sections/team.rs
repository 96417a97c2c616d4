//! Team: member cards flip up in a stagger

use scrollwork_animation::{Easing, TransitionSpec, VisualState};
use scrollwork_core::{Document, ElementId, LayoutHost, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, OwnerId, RegistryHandle};

use super::{insert_many, place_grid, rows, title_reveal, Mounter, Section};
use crate::error::Result;

const COLUMNS: usize = 3;
const CARD_ROW: f32 = 480.0;

pub struct Team {
    section: ElementId,
    title: ElementId,
    cards: Vec<ElementId>,
    handles: Vec<BindingHandle>,
}

impl Team {
    pub fn new(doc: &mut Document, members: usize) -> Self {
        Self {
            section: doc.insert("team", Rect::ZERO),
            title: doc.insert("team-title", Rect::ZERO),
            cards: insert_many(doc, "team-card", members),
            handles: Vec::new(),
        }
    }

    pub fn section(&self) -> ElementId {
        self.section
    }

    pub fn cards(&self) -> &[ElementId] {
        &self.cards
    }

    fn card_reveal() -> Result<TransitionSpec> {
        Ok(TransitionSpec::builder(
            VisualState::new()
                .with(Property::TranslateY, 100.0)
                .with(Property::Opacity, 0.0)
                .with(Property::RotationX, 45.0)
                .with(Property::Scale, 0.8),
            VisualState::new()
                .with(Property::TranslateY, 0.0)
                .with(Property::Opacity, 1.0)
                .with(Property::RotationX, 0.0)
                .with(Property::Scale, 1.0),
        )
        .duration_secs(1.2)
        .stagger_secs(0.15)
        .easing(Easing::QuartOut)
        .build()?)
    }
}

impl Section for Team {
    fn owner(&self) -> OwnerId {
        OwnerId::new("team")
    }

    fn height(&self, _viewport: Viewport) -> f32 {
        360.0 + rows(self.cards.len(), COLUMNS) * CARD_ROW
    }

    fn place(&self, doc: &mut Document, top: f32) {
        let viewport = doc.viewport();
        doc.set_rect(self.section, Rect::new(0.0, top, viewport.width, self.height(viewport)));
        doc.set_rect(self.title, Rect::new(0.0, top + 96.0, viewport.width, 120.0));
        place_grid(doc, &self.cards, top + 280.0, viewport, COLUMNS, CARD_ROW);
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());
        mounter.reveal(self.section, "top 80%", title_reveal()?, [self.title], "team-title")?;
        mounter.reveal(
            self.section,
            "top 60%",
            Self::card_reveal()?,
            self.cards.iter().copied(),
            "team-cards",
        )?;
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
    fn test_card_stagger() {
        let spec = Team::card_reveal().unwrap();
        assert_eq!(spec.stagger_ms(), 150.0);
        assert_eq!(spec.from_state().get(Property::RotationX), Some(45.0));
    }

    #[test]
    fn test_cards_play_once() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let mut team = Team::new(&mut doc, 6);
        team.place(&mut doc, 2000.0);
        let registry = BindingRegistry::new();
        team.mount(&mut doc, &registry.handle()).unwrap();

        // "top 60%" is 2000 - 480
        registry.on_scroll(&mut doc, 1510.0);
        assert!(!team.handles()[1].has_played_forward());
        registry.on_scroll(&mut doc, 1530.0);
        assert!(team.handles()[1].has_played_forward());
        while registry.tick(&mut doc, 1.0 / 60.0) {}

        let writes = doc.write_count();
        registry.on_scroll(&mut doc, 0.0);
        registry.on_scroll(&mut doc, 1600.0);
        assert!(!registry.tick(&mut doc, 1.0 / 60.0));
        assert_eq!(doc.write_count(), writes);
        for &card in team.cards() {
            assert_eq!(doc.style(card, Property::RotationX), Some(0.0));
        }
    }
}
