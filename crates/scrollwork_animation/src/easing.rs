//! Easing curves
//!
//! Names follow the power-curve family used by most web animation libraries:
//! `power1` is quadratic, `power2` cubic, `power3` quartic. Strings such as
//! `"power3.out"` or `"none"` parse into an [`Easing`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// An easing function mapping linear time `t` in [0, 1] to eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    SineInOut,
}

impl Easing {
    /// Apply the curve; input is clamped to [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }

    /// Canonical name, e.g. `"power3.out"`
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "none",
            Easing::QuadIn => "power1.in",
            Easing::QuadOut => "power1.out",
            Easing::QuadInOut => "power1.inOut",
            Easing::CubicIn => "power2.in",
            Easing::CubicOut => "power2.out",
            Easing::CubicInOut => "power2.inOut",
            Easing::QuartIn => "power3.in",
            Easing::QuartOut => "power3.out",
            Easing::QuartInOut => "power3.inOut",
            Easing::SineInOut => "sine.inOut",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let easing = match s {
            "none" | "linear" | "power0" => Easing::Linear,
            "power1.in" => Easing::QuadIn,
            // A bare family name means `.out`
            "power1" | "power1.out" => Easing::QuadOut,
            "power1.inOut" => Easing::QuadInOut,
            "power2.in" => Easing::CubicIn,
            "power2" | "power2.out" => Easing::CubicOut,
            "power2.inOut" => Easing::CubicInOut,
            "power3.in" => Easing::QuartIn,
            "power3" | "power3.out" => Easing::QuartOut,
            "power3.inOut" => Easing::QuartInOut,
            "sine.inOut" => Easing::SineInOut,
            other => return Err(AnimationError::UnknownEasing(other.to_string())),
        };
        Ok(easing)
    }
}

impl TryFrom<String> for Easing {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 11] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing} at 1");
        }
    }

    #[test]
    fn test_shapes() {
        assert!((Easing::Linear.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::QuadIn.apply(0.5) < 0.5);
        assert!(Easing::QuartOut.apply(0.5) > 0.9);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_input() {
        assert_eq!(Easing::CubicOut.apply(-1.0), 0.0);
        assert_eq!(Easing::CubicOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_parse_names() {
        for easing in ALL {
            assert_eq!(easing.name().parse::<Easing>().ok(), Some(easing));
        }
        assert_eq!("power3".parse::<Easing>().ok(), Some(Easing::QuartOut));
        assert!("elastic.out".parse::<Easing>().is_err());
    }
}
