//! Error types for scrollwork_core

use thiserror::Error;

/// Errors raised while describing documents or properties
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Property name not in the animatable set
    #[error("unknown visual property: {0:?}")]
    UnknownProperty(String),

    /// Viewport dimensions must be finite and positive
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// Malformed `WIDTHxHEIGHT` string
    #[error("cannot parse viewport from {0:?} (expected WIDTHxHEIGHT)")]
    ViewportSyntax(String),
}

/// Result type for scrollwork_core operations
pub type Result<T> = std::result::Result<T, CoreError>;
