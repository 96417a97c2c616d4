//! Animatable visual properties
//!
//! The engine only ever writes these keys. Hosts map them onto whatever
//! their rendering layer understands (CSS transforms, layer properties, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A visual property the engine can animate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Horizontal translation in pixels
    #[serde(rename = "x")]
    TranslateX,
    /// Vertical translation in pixels
    #[serde(rename = "y")]
    TranslateY,
    /// Opacity (0.0 to 1.0)
    Opacity,
    /// Uniform scale factor
    Scale,
    /// Rotation around the X axis in degrees
    RotationX,
    /// Rotation around the Y axis in degrees
    RotationY,
    /// Vertical offset that keeps a pinned section fixed on screen
    PinOffset,
    /// Stroke dash offset in path-length units; 0 draws the full stroke
    #[serde(rename = "strokeDashoffset")]
    StrokeDashOffset,
}

impl Property {
    /// All properties in declaration order
    pub const ALL: [Property; 8] = [
        Property::TranslateX,
        Property::TranslateY,
        Property::Opacity,
        Property::Scale,
        Property::RotationX,
        Property::RotationY,
        Property::PinOffset,
        Property::StrokeDashOffset,
    ];

    /// Short name used in configs and logs
    pub fn name(self) -> &'static str {
        match self {
            Property::TranslateX => "x",
            Property::TranslateY => "y",
            Property::Opacity => "opacity",
            Property::Scale => "scale",
            Property::RotationX => "rotationX",
            Property::RotationY => "rotationY",
            Property::PinOffset => "pinOffset",
            Property::StrokeDashOffset => "strokeDashoffset",
        }
    }

    /// Value of this property when nothing has been written
    pub fn identity(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| CoreError::UnknownProperty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for p in Property::ALL {
            assert_eq!(p.name().parse::<Property>(), Ok(p));
        }
        assert!("blur".parse::<Property>().is_err());
    }

    #[test]
    fn test_identity_values() {
        assert_eq!(Property::Opacity.identity(), 1.0);
        assert_eq!(Property::Scale.identity(), 1.0);
        assert_eq!(Property::TranslateY.identity(), 0.0);
        assert_eq!(Property::StrokeDashOffset.identity(), 0.0);
    }
}
