//! Error types for scrollwork_animation

use scrollwork_core::Property;
use thiserror::Error;

/// Errors raised when building animation specs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// `from` and `to` states animate different properties
    #[error("from/to property sets differ (only in from: {only_from:?}, only in to: {only_to:?})")]
    KeyMismatch {
        only_from: Vec<Property>,
        only_to: Vec<Property>,
    },

    /// A transition must animate at least one property
    #[error("transition animates no properties")]
    EmptyState,

    /// NaN or infinite property value
    #[error("non-finite value {value} for property {property}")]
    NonFinite { property: Property, value: f32 },

    /// Negative or non-finite timing field
    #[error("invalid {field}: {value}")]
    InvalidTiming { field: &'static str, value: f32 },

    /// Easing name not recognised
    #[error("unknown easing: {0:?}")]
    UnknownEasing(String),
}

/// Result type for scrollwork_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
