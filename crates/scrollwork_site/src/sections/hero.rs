//! Hero: intro timeline, floating content, and the 3D embed

use scrollwork_animation::{Easing, Position, Repeat, Timeline, TransitionSpec, Tween, VisualState};
use scrollwork_core::{Document, ElementId, LayoutHost, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, BindingSpec, OwnerId, RegistryHandle};

use super::{rise, Mounter, Section};
use crate::config::EmbedConfig;
use crate::embed::{EmbedLoader, EmbedSlot};
use crate::error::Result;

pub struct Hero {
    section: ElementId,
    /// Wrapper that floats as a whole
    content: ElementId,
    title: ElementId,
    subtitle: ElementId,
    cta: ElementId,
    scene: ElementId,
    embed: EmbedSlot,
    handles: Vec<BindingHandle>,
}

impl Hero {
    pub fn new(doc: &mut Document, embed: &EmbedConfig) -> Self {
        Self {
            section: doc.insert("hero", Rect::ZERO),
            content: doc.insert("hero-content", Rect::ZERO),
            title: doc.insert("hero-title", Rect::ZERO),
            subtitle: doc.insert("hero-subtitle", Rect::ZERO),
            cta: doc.insert("hero-cta", Rect::ZERO),
            scene: doc.insert("hero-scene", Rect::ZERO),
            embed: EmbedSlot::new(embed),
            handles: Vec::new(),
        }
    }

    pub fn title(&self) -> ElementId {
        self.title
    }

    pub fn subtitle(&self) -> ElementId {
        self.subtitle
    }

    pub fn cta(&self) -> ElementId {
        self.cta
    }

    pub fn content(&self) -> ElementId {
        self.content
    }

    pub fn embed(&self) -> &EmbedSlot {
        &self.embed
    }

    pub fn embed_mut(&mut self) -> &mut EmbedSlot {
        &mut self.embed
    }

    /// Kick off the 3D scene; failures only swap in the placeholder
    pub fn start_embed(&mut self, loader: Option<&mut dyn EmbedLoader>) {
        self.embed.start(loader);
    }

    fn intro() -> Result<[(TransitionSpec, Position); 3]> {
        let step = |distance: f32, secs: f32| -> Result<TransitionSpec> {
            let (from, to) = rise(Property::TranslateY, distance);
            Ok(TransitionSpec::builder(from, to)
                .duration_secs(secs)
                .easing(Easing::QuartOut)
                .build()?)
        };
        Ok([
            (step(100.0, 1.2)?, Position::Append),
            (step(50.0, 1.0)?, Position::Overlap(500.0)),
            (step(30.0, 0.8)?, Position::Overlap(300.0)),
        ])
    }
}

impl Section for Hero {
    fn owner(&self) -> OwnerId {
        OwnerId::new("hero")
    }

    fn height(&self, viewport: Viewport) -> f32 {
        viewport.height
    }

    fn place(&self, doc: &mut Document, top: f32) {
        let viewport = doc.viewport();
        let width = viewport.width;
        doc.set_rect(self.section, Rect::new(0.0, top, width, viewport.height));
        doc.set_rect(self.scene, Rect::new(0.0, top, width, viewport.height));

        let content_top = top + viewport.height * 0.35;
        doc.set_rect(self.content, Rect::new(0.0, content_top, width, 400.0));
        doc.set_rect(self.title, Rect::new(0.0, content_top, width, 120.0));
        doc.set_rect(self.subtitle, Rect::new(0.0, content_top + 140.0, width, 80.0));
        doc.set_rect(self.cta, Rect::new(0.0, content_top + 240.0, width, 60.0));
    }

    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()> {
        let mut mounter = Mounter::new(doc, registry, self.owner());

        let mut timeline = Timeline::new();
        let targets = [self.title, self.subtitle, self.cta];
        for ((spec, position), target) in Self::intro()?.into_iter().zip(targets) {
            timeline.add(Tween::new(spec, [target]), position);
        }
        mounter.register(BindingSpec::timeline(timeline).named("hero-intro"));

        let float = TransitionSpec::builder(
            VisualState::new().with(Property::TranslateY, 0.0),
            VisualState::new().with(Property::TranslateY, -10.0),
        )
        .duration_secs(3.0)
        .easing(Easing::QuadInOut)
        .repeat(Repeat::infinite_yoyo())
        .build()?;
        mounter.register(BindingSpec::autoplay(float, [self.content]).named("hero-float"));

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
    fn test_intro_overlaps() {
        let steps = Hero::intro().unwrap();
        let mut timeline = Timeline::new();
        let mut doc = Document::new(Viewport::default());
        let target = doc.insert("t", Rect::ZERO);
        for (spec, position) in steps {
            timeline.add(Tween::new(spec, [target]), position);
        }
        assert_eq!(timeline.start_of(1), Some(700.0));
        assert_eq!(timeline.start_of(2), Some(1400.0));
        assert_eq!(timeline.duration_ms(), 2200.0);
    }

    #[test]
    fn test_mount_renders_intro_from_state() {
        let mut doc = Document::new(Viewport::new(1280.0, 800.0));
        let mut hero = Hero::new(&mut doc, &EmbedConfig::default());
        hero.place(&mut doc, 0.0);
        let registry = BindingRegistry::new();

        hero.mount(&mut doc, &registry.handle()).unwrap();
        assert_eq!(hero.handles().len(), 2);
        assert_eq!(registry.bindings_for("hero"), 2);
        assert_eq!(doc.style(hero.title(), Property::Opacity), Some(0.0));
        assert_eq!(doc.style(hero.title(), Property::TranslateY), Some(100.0));
        assert_eq!(doc.style(hero.cta(), Property::TranslateY), Some(30.0));

        // 2.2s of intro at 60fps
        for _ in 0..140 {
            registry.tick(&mut doc, 1.0 / 60.0);
        }
        assert_eq!(doc.style(hero.title(), Property::Opacity), Some(1.0));
        assert_eq!(doc.style(hero.cta(), Property::TranslateY), Some(0.0));

        // Floating never settles
        assert!(registry.tick(&mut doc, 1.0 / 60.0));
        let y = doc.resolved_style(hero.content(), Property::TranslateY);
        assert!((-10.0..=0.0).contains(&y));
        assert!(doc.bounds(hero.content()).is_some());

        assert_eq!(hero.unmount(&registry.handle()), 2);
        assert!(!registry.tick(&mut doc, 1.0 / 60.0));
    }
}
