//! Headless scroll simulation
//!
//! Mounts the page, scrolls it to the bottom and back up in fixed steps,
//! renders a few frames after every step, then tears everything down. The
//! resulting [`SimReport`] summarises what the engine did.

use scrollwork_core::{Property, Viewport};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::embed::EmbedLoader;
use crate::error::Result;
use crate::page::LandingPage;

/// Summary of one simulated pass
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimReport {
    pub viewport: Viewport,
    pub page_height: f32,
    pub max_scroll: f32,
    /// Horizontal overflow of the events strip
    pub pin_width: f32,
    pub bindings: usize,
    pub owners: usize,
    /// One-shot reveals that played during the pass
    pub reveals_played: usize,
    pub frames: u64,
    pub pinned_frames: u64,
    /// Furthest the strip travelled, as a positive distance
    pub max_strip_travel: f32,
    /// Strip translation after scrolling back to the top
    pub final_strip_translation: f32,
    pub property_writes: u64,
    pub embed: String,
    pub released: usize,
}

pub struct Simulation {
    config: SiteConfig,
    page: LandingPage,
    frames: u64,
    pinned_frames: u64,
    max_strip_travel: f32,
}

impl Simulation {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let page = LandingPage::new(&config)?;
        Ok(Self {
            config,
            page,
            frames: 0,
            pinned_frames: 0,
            max_strip_travel: 0.0,
        })
    }

    pub fn page(&self) -> &LandingPage {
        &self.page
    }

    /// Run the full pass and tear the page down
    pub fn run(mut self, loader: Option<&mut dyn EmbedLoader>) -> Result<SimReport> {
        self.page.mount(loader)?;
        let settle = self.config.simulation.settle_frames;
        let step = self.config.simulation.scroll_step;
        let max_scroll = self.page.max_scroll();
        info!(max_scroll, step, "simulating scroll pass");

        self.render_frames(settle);

        let mut y = 0.0;
        while y < max_scroll {
            y = self.page.scroll_to(y + step);
            self.render_frames(self.config.simulation.frames_per_step);
        }
        self.render_frames(settle);
        debug!(y, "reached bottom");

        while y > 0.0 {
            y = self.page.scroll_to(y - step);
            self.render_frames(self.config.simulation.frames_per_step);
        }
        self.render_frames(settle);
        debug!("back at top");

        let strip = self.page.sections().events.strip();
        let doc = self.page.document();
        let mut report = SimReport {
            viewport: self.config.viewport,
            page_height: doc.page_height(),
            max_scroll,
            pin_width: self.page.registry().pin_spacing(),
            bindings: self.page.registry().len(),
            owners: self.page.registry().owner_count(),
            reveals_played: self
                .page
                .handles()
                .filter(|handle| handle.has_played_forward())
                .count(),
            frames: self.frames,
            pinned_frames: self.pinned_frames,
            max_strip_travel: self.max_strip_travel,
            final_strip_translation: doc.resolved_style(strip, Property::TranslateX),
            property_writes: doc.write_count(),
            embed: self.page.sections().hero.embed().state().to_string(),
            released: 0,
        };
        report.released = self.page.unmount();
        Ok(report)
    }

    fn render_frames(&mut self, count: u32) {
        let dt = self.config.frame_secs();
        let strip = self.page.sections().events.strip();
        for _ in 0..count {
            self.page.tick(dt);
            self.frames += 1;

            if self
                .page
                .sections()
                .events
                .pin()
                .is_some_and(|pin| pin.is_pinned())
            {
                self.pinned_frames += 1;
            }
            let travel = -self
                .page
                .document()
                .resolved_style(strip, Property::TranslateX);
            self.max_strip_travel = self.max_strip_travel.max(travel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentConfig;

    fn quick_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.simulation.scroll_step = 200.0;
        config.simulation.settle_frames = 240;
        config
    }

    #[test]
    fn test_full_pass() {
        let report = Simulation::new(quick_config()).unwrap().run(None).unwrap();

        assert!(report.max_scroll > 0.0);
        assert_eq!(report.pin_width, 6.0 * 384.0 + 5.0 * 32.0 - 1280.0);
        // Every reveal fires once on the way down
        assert_eq!(report.reveals_played, 13);
        assert!(report.pinned_frames > 0);
        assert_eq!(report.max_strip_travel, report.pin_width);
        assert_eq!(report.final_strip_translation, 0.0);
        assert_eq!(report.released, report.bindings);
        assert!(report.embed.starts_with("fallback"));
    }

    #[test]
    fn test_pass_without_overflow() {
        let mut config = quick_config();
        config.content = ContentConfig {
            event_cards: 2,
            ..ContentConfig::default()
        };
        let report = Simulation::new(config).unwrap().run(None).unwrap();
        assert_eq!(report.pin_width, 0.0);
        assert_eq!(report.pinned_frames, 0);
        assert_eq!(report.max_strip_travel, 0.0);
    }
}
