//! Error types for scrollwork_trigger

use scrollwork_animation::AnimationError;
use thiserror::Error;

/// Errors raised while building triggers and bindings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriggerError {
    /// Trigger position string could not be parsed
    #[error("invalid trigger position {input:?}: {reason}")]
    PositionSyntax { input: String, reason: &'static str },

    /// Scrub smoothing lag must be positive and finite
    #[error("invalid scrub lag: {0}")]
    InvalidLag(f32),

    /// Invalid transition
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

impl TriggerError {
    pub(crate) fn syntax(input: &str, reason: &'static str) -> Self {
        TriggerError::PositionSyntax {
            input: input.to_string(),
            reason,
        }
    }
}

/// Result type for scrollwork_trigger operations
pub type Result<T> = std::result::Result<T, TriggerError>;
