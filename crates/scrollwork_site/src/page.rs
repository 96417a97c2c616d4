//! The landing page: sections stacked in a headless document
//!
//! The page owns the [`Document`] and the [`BindingRegistry`]; sections get
//! a weak [`RegistryHandle`](scrollwork_trigger::RegistryHandle) when
//! mounted. Layout is recomputed from scratch whenever the viewport or pin
//! spacing may have changed, and the registry is refreshed right after so
//! trigger windows follow the new geometry.

use scrollwork_core::{Document, LayoutHost, Viewport};
use scrollwork_trigger::{BindingHandle, BindingRegistry};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::embed::{EmbedError, EmbedLoader};
use crate::error::Result;
use crate::sections::{About, Circuit, Contact, Events, Hero, Section, Sponsors, Team};

/// Every section, in page order, then the background overlay
pub struct Sections {
    pub hero: Hero,
    pub about: About,
    pub events: Events,
    pub team: Team,
    pub sponsors: Sponsors,
    pub contact: Contact,
    pub circuit: Circuit,
}

impl Sections {
    fn new(doc: &mut Document, config: &SiteConfig) -> Self {
        let content = &config.content;
        Self {
            hero: Hero::new(doc, &config.embed),
            about: About::new(doc, content.about_cards),
            events: Events::new(doc, content),
            team: Team::new(doc, content.team_members),
            sponsors: Sponsors::new(doc, content.sponsor_logos, content.partners),
            contact: Contact::new(doc),
            circuit: Circuit::new(doc),
        }
    }

    pub fn all(&self) -> [&dyn Section; 7] {
        [
            &self.hero,
            &self.about,
            &self.events,
            &self.team,
            &self.sponsors,
            &self.contact,
            &self.circuit,
        ]
    }

    pub fn all_mut(&mut self) -> [&mut dyn Section; 7] {
        [
            &mut self.hero,
            &mut self.about,
            &mut self.events,
            &mut self.team,
            &mut self.sponsors,
            &mut self.contact,
            &mut self.circuit,
        ]
    }
}

pub struct LandingPage {
    doc: Document,
    registry: BindingRegistry,
    sections: Sections,
    mounted: bool,
}

impl LandingPage {
    /// Build the document and lay it out; nothing is animated until [`mount`]
    ///
    /// [`mount`]: LandingPage::mount
    pub fn new(config: &SiteConfig) -> Result<Self> {
        config.validate()?;
        let mut doc = Document::new(config.viewport);
        let sections = Sections::new(&mut doc, config);
        let mut page = Self {
            doc,
            registry: BindingRegistry::new(),
            sections,
            mounted: false,
        };
        page.layout();
        Ok(page)
    }

    /// Register every section's bindings and start the hero embed
    pub fn mount(&mut self, loader: Option<&mut dyn EmbedLoader>) -> Result<()> {
        if self.mounted {
            return Ok(());
        }
        let handle = self.registry.handle();
        for section in self.sections.all_mut() {
            section.mount(&mut self.doc, &handle)?;
            debug!(
                owner = %section.owner(),
                bindings = section.handles().len(),
                "section mounted"
            );
        }
        self.sections.hero.start_embed(loader);
        self.mounted = true;

        // Pins now know their widths; push later sections down and re-resolve
        self.refresh();
        info!(
            bindings = self.registry.len(),
            page_height = self.doc.page_height(),
            "page mounted"
        );
        Ok(())
    }

    /// Release every section's bindings; returns how many were released
    pub fn unmount(&mut self) -> usize {
        let handle = self.registry.handle();
        let released: usize = self
            .sections
            .all_mut()
            .into_iter()
            .map(|section| section.unmount(&handle))
            .sum();
        if self.mounted {
            info!(released, "page unmounted");
        }
        self.mounted = false;
        self.layout();
        released
    }

    /// Stack sections top to bottom, leaving room below each pinned one
    fn layout(&mut self) {
        let viewport = self.doc.viewport();
        let mut top = 0.0;
        for section in self.sections.all() {
            section.place(&mut self.doc, top);
            top += section.height(viewport) + section.pin_spacing(&self.doc);
        }
    }

    /// Re-run layout and re-derive every trigger window
    pub fn refresh(&mut self) {
        self.layout();
        self.registry.refresh(&mut self.doc);
    }

    /// Apply a new viewport size
    pub fn resize(&mut self, viewport: Viewport) {
        self.doc.set_viewport(viewport);
        self.layout();
        self.registry.on_resize(&mut self.doc);
        let max = self.max_scroll();
        if self.doc.scroll_y() > max {
            self.scroll_to(max);
        }
    }

    /// Scroll to `y`, clamped to the page; returns the applied position
    pub fn scroll_to(&mut self, y: f32) -> f32 {
        let y = y.clamp(0.0, self.max_scroll());
        self.doc.set_scroll_y(y);
        self.registry.on_scroll(&mut self.doc, y);
        y
    }

    /// Advance one frame of `dt` seconds; returns `true` while anything animates
    pub fn tick(&mut self, dt: f32) -> bool {
        self.sections
            .hero
            .embed_mut()
            .tick((dt.max(0.0) * 1000.0) as u64);
        self.registry.tick(&mut self.doc, dt)
    }

    /// The hero loader finished; the scene replaces the loading text
    pub fn embed_loaded(&mut self) {
        self.sections.hero.embed_mut().on_load();
    }

    /// The hero loader failed; the placeholder is shown instead
    pub fn embed_failed(&mut self, error: EmbedError) {
        self.sections.hero.embed_mut().on_error(error);
    }

    pub fn max_scroll(&self) -> f32 {
        self.doc.max_scroll()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Every handle the sections registered, in page order
    pub fn handles(&self) -> impl Iterator<Item = &BindingHandle> + '_ {
        self.sections
            .all()
            .into_iter()
            .flat_map(|section| section.handles().iter())
    }
}
