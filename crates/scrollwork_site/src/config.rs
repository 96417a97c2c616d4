//! Site configuration
//!
//! Loaded from a TOML file; every table and key is optional.
//!
//! ```toml
//! log_filter = "scrollwork_trigger=debug"
//!
//! [viewport]
//! width = 1440.0
//! height = 900.0
//!
//! [simulation]
//! scroll_step = 80.0
//!
//! [content]
//! event_cards = 6
//!
//! [embed]
//! scene = "loading..."
//! ```

use std::fs;
use std::path::Path;

use scrollwork_core::Viewport;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Scene value meaning "no scene configured yet"
pub const UNSET_SCENE: &str = "loading...";

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `tracing` filter directive; `RUST_LOG` wins when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    pub viewport: Viewport,
    pub simulation: SimulationConfig,
    pub content: ContentConfig,
    pub embed: EmbedConfig,
}

/// How the headless simulator drives the page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Pixels scrolled between frames
    pub scroll_step: f32,
    pub fps: u32,
    /// Frames rendered after each scroll step
    pub frames_per_step: u32,
    /// Frames rendered at each end of the pass so playback can finish
    pub settle_frames: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scroll_step: 120.0,
            fps: 60,
            frames_per_step: 4,
            settle_frames: 180,
        }
    }
}

/// Section content counts; only what shapes animation is modelled
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub about_cards: usize,
    pub event_cards: usize,
    pub event_card_width: f32,
    pub event_card_gap: f32,
    pub team_members: usize,
    pub sponsor_logos: usize,
    pub partners: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            about_cards: 4,
            event_cards: 6,
            event_card_width: 384.0,
            event_card_gap: 32.0,
            team_members: 6,
            sponsor_logos: 8,
            partners: 4,
        }
    }
}

impl ContentConfig {
    /// Laid-out width of the events strip
    pub fn event_strip_width(&self) -> f32 {
        if self.event_cards == 0 {
            return 0.0;
        }
        let n = self.event_cards as f32;
        n * self.event_card_width + (n - 1.0) * self.event_card_gap
    }
}

/// The hero's 3D embed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Scene URL, or [`UNSET_SCENE`]
    pub scene: String,
    /// Give up and show the fallback after this long
    pub loading_timeout_ms: u64,
    pub fallback_icon: String,
    pub loading_text: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            scene: "https://prod.spline.design/EvgyMmRJiP19tMoh/scene.splinecode".to_string(),
            loading_timeout_ms: 10_000,
            fallback_icon: "🤖".to_string(),
            loading_text: "Loading AI Robot".to_string(),
        }
    }
}

impl EmbedConfig {
    pub fn is_scene_set(&self) -> bool {
        let scene = self.scene.trim();
        !scene.is_empty() && scene != UNSET_SCENE
    }
}

impl SiteConfig {
    /// Read and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SiteError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        Viewport::try_new(self.viewport.width, self.viewport.height)?;

        let sim = &self.simulation;
        if !(sim.scroll_step.is_finite() && sim.scroll_step > 0.0) {
            return Err(SiteError::InvalidConfig {
                field: "simulation.scroll_step",
                reason: "must be a positive number",
            });
        }
        if sim.fps == 0 {
            return Err(SiteError::InvalidConfig {
                field: "simulation.fps",
                reason: "must be at least 1",
            });
        }

        let content = &self.content;
        for (field, value) in [
            ("content.event_card_width", content.event_card_width),
            ("content.event_card_gap", content.event_card_gap),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SiteError::InvalidConfig {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }
        Ok(())
    }

    /// Seconds per simulated frame
    pub fn frame_secs(&self) -> f32 {
        1.0 / self.simulation.fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_default_round_trip() {
        let text = SiteConfig::default().to_toml_string().unwrap();
        let parsed = SiteConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, SiteConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SiteConfig::from_toml_str(
            r#"
            log_filter = "debug"

            [viewport]
            width = 800.0
            height = 600.0

            [content]
            event_cards = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.viewport, Viewport::new(800.0, 600.0));
        assert_eq!(config.content.event_cards, 2);
        assert_eq!(config.content.team_members, 6);
        assert_eq!(config.simulation.fps, 60);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SiteConfig::from_toml_str("[simulation]\nfps = 0"),
            Err(SiteError::InvalidConfig { field: "simulation.fps", .. })
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("[simulation]\nscroll_step = -5.0"),
            Err(SiteError::InvalidConfig { .. })
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("[viewport]\nwidth = 0.0\nheight = 600.0"),
            Err(SiteError::Core(_))
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("viewport = 3"),
            Err(SiteError::ParseConfig(_))
        ));
    }

    #[test]
    fn test_strip_width() {
        let content = ContentConfig::default();
        assert_eq!(content.event_strip_width(), 6.0 * 384.0 + 5.0 * 32.0);
        let empty = ContentConfig {
            event_cards: 0,
            ..ContentConfig::default()
        };
        assert_eq!(empty.event_strip_width(), 0.0);
    }

    #[test]
    fn test_unset_scene() {
        let mut embed = EmbedConfig::default();
        assert!(embed.is_scene_set());
        embed.scene = UNSET_SCENE.to_string();
        assert!(!embed.is_scene_set());
    }
}
