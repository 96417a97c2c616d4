//! Optional 3D scene embed with a static fallback
//!
//! The hero shows a 3D scene when a renderer is available. The engine treats
//! that renderer as a black box: an [`EmbedLoader`] is asked to start loading
//! a scene, and later reports back through [`EmbedSlot::on_load`] or
//! [`EmbedSlot::on_error`]. Anything that goes wrong (no loader installed,
//! no scene configured, a load error, a timeout) degrades the slot to a
//! static [`Placeholder`]. None of it ever fails the section that owns the
//! slot.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::EmbedConfig;

/// Why an embed could not be shown
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbedError {
    #[error("no 3D renderer is installed")]
    MissingModule,

    #[error("no scene configured")]
    SceneUnset,

    #[error("scene failed to load: {0}")]
    Load(String),

    #[error("scene did not load within {0} ms")]
    Timeout(u64),
}

/// Trait for 3D scene renderers
pub trait EmbedLoader {
    /// Begin loading `scene`; completion is reported through the slot
    fn request(&mut self, scene: &str) -> Result<(), EmbedError>;

    /// Get the loader name for debugging
    fn name(&self) -> &'static str;
}

/// Loader for builds without a 3D renderer
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEmbedLoader;

impl EmbedLoader for NullEmbedLoader {
    fn request(&mut self, _scene: &str) -> Result<(), EmbedError> {
        Err(EmbedError::MissingModule)
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Static content shown instead of the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub icon: String,
    pub caption: String,
}

/// State of an embed slot
#[derive(Clone, Debug, PartialEq)]
pub enum EmbedState {
    /// Waiting for the loader; shows the loading text
    Loading { elapsed_ms: u64 },
    /// The scene is live
    Loaded { scene: String },
    /// Showing the static placeholder
    Fallback { reason: EmbedError },
}

impl fmt::Display for EmbedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedState::Loading { .. } => f.write_str("loading"),
            EmbedState::Loaded { .. } => f.write_str("loaded"),
            EmbedState::Fallback { reason } => write!(f, "fallback ({reason})"),
        }
    }
}

/// One embed on the page
#[derive(Debug)]
pub struct EmbedSlot {
    scene: String,
    scene_set: bool,
    timeout_ms: u64,
    placeholder: Placeholder,
    loading_text: String,
    state: EmbedState,
    /// Failures are logged once per slot
    warned: bool,
}

impl EmbedSlot {
    pub fn new(config: &EmbedConfig) -> Self {
        Self {
            scene: config.scene.clone(),
            scene_set: config.is_scene_set(),
            timeout_ms: config.loading_timeout_ms,
            placeholder: Placeholder {
                icon: config.fallback_icon.clone(),
                caption: config.loading_text.clone(),
            },
            loading_text: config.loading_text.clone(),
            state: EmbedState::Loading { elapsed_ms: 0 },
            warned: false,
        }
    }

    /// Start loading through `loader`; `None` means no renderer is installed
    ///
    /// An unset scene goes straight to the fallback without asking the loader.
    pub fn start(&mut self, loader: Option<&mut dyn EmbedLoader>) {
        if !matches!(self.state, EmbedState::Loading { .. }) {
            return;
        }
        if !self.scene_set {
            self.fall_back(EmbedError::SceneUnset);
            return;
        }
        let Some(loader) = loader else {
            self.fall_back(EmbedError::MissingModule);
            return;
        };
        debug!(loader = loader.name(), scene = %self.scene, "requesting 3D scene");
        if let Err(err) = loader.request(&self.scene) {
            self.fall_back(err);
        }
    }

    /// The loader finished successfully
    pub fn on_load(&mut self) {
        match self.state {
            EmbedState::Loading { .. } => {
                debug!(scene = %self.scene, "3D scene loaded");
                self.state = EmbedState::Loaded {
                    scene: self.scene.clone(),
                };
            }
            _ => trace!(state = %self.state, "late load ignored"),
        }
    }

    /// The loader failed
    pub fn on_error(&mut self, error: EmbedError) {
        if let EmbedState::Loading { .. } = self.state {
            self.fall_back(error);
        } else {
            trace!(state = %self.state, %error, "late error ignored");
        }
    }

    /// Advance the loading timer
    pub fn tick(&mut self, dt_ms: u64) {
        if let EmbedState::Loading { elapsed_ms } = &mut self.state {
            *elapsed_ms = elapsed_ms.saturating_add(dt_ms);
            if *elapsed_ms >= self.timeout_ms {
                let timeout = self.timeout_ms;
                self.fall_back(EmbedError::Timeout(timeout));
            }
        }
    }

    fn fall_back(&mut self, reason: EmbedError) {
        if !self.warned {
            warn!(scene = %self.scene, %reason, "3D embed unavailable, showing fallback");
            self.warned = true;
        }
        self.state = EmbedState::Fallback { reason };
    }

    pub fn state(&self) -> &EmbedState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, EmbedState::Loaded { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.state, EmbedState::Fallback { .. })
    }

    /// What to show right now, if not the scene
    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.is_fallback().then_some(&self.placeholder)
    }

    /// Text shown while loading
    pub fn loading_text(&self) -> Option<&str> {
        match self.state {
            EmbedState::Loading { .. } => Some(&self.loading_text),
            _ => None,
        }
    }
}
