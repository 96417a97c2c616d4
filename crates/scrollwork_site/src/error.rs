//! Error types for scrollwork_site

use std::path::PathBuf;

use scrollwork_animation::AnimationError;
use scrollwork_core::CoreError;
use scrollwork_trigger::TriggerError;
use thiserror::Error;

/// Errors raised while configuring or mounting the page
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeConfig(#[from] toml::ser::Error),

    /// A config value outside its allowed range
    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error(transparent)]
    Trigger(#[from] TriggerError),
}

/// Result type for scrollwork_site operations
pub type Result<T> = std::result::Result<T, SiteError>;
