//! Trigger positions
//!
//! A position pairs a point on the target element with a line across the
//! viewport, written `"<element> <viewport>"`:
//!
//! - `"top 80%"`: the element's top edge meets the line 80% down the viewport
//! - `"bottom 20%"`: the element's bottom edge meets the line 20% down
//! - `"top top"`: the element's top reaches the top of the viewport
//!
//! Each side accepts `top`, `center`, `bottom`, a percentage, or a pixel
//! offset (`"120px"` or a bare number). An end position may instead be
//! relative to the start, written `"+=600"`.

use std::fmt;
use std::str::FromStr;

use scrollwork_core::{ElementId, Rect, Viewport};

use crate::error::{Result, TriggerError};

/// An offset along a length, either proportional or absolute
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Fraction of the length, 0.0 = top/start
    Fraction(f32),
    /// Pixels from the top/start
    Px(f32),
}

impl Anchor {
    pub const TOP: Anchor = Anchor::Fraction(0.0);
    pub const CENTER: Anchor = Anchor::Fraction(0.5);
    pub const BOTTOM: Anchor = Anchor::Fraction(1.0);

    /// Offset in pixels along `length`
    pub fn resolve(self, length: f32) -> f32 {
        match self {
            Anchor::Fraction(f) => length * f,
            Anchor::Px(px) => px,
        }
    }

    fn parse(token: &str, input: &str) -> Result<Self> {
        match token {
            "top" => return Ok(Anchor::TOP),
            "center" => return Ok(Anchor::CENTER),
            "bottom" => return Ok(Anchor::BOTTOM),
            _ => {}
        }
        if let Some(pct) = token.strip_suffix('%') {
            let value = parse_number(pct, input)?;
            return Ok(Anchor::Fraction(value / 100.0));
        }
        let px = token.strip_suffix("px").unwrap_or(token);
        Ok(Anchor::Px(parse_number(px, input)?))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Anchor::Fraction(v) if v == 0.0 => f.write_str("top"),
            Anchor::Fraction(v) if v == 0.5 => f.write_str("center"),
            Anchor::Fraction(v) if v == 1.0 => f.write_str("bottom"),
            Anchor::Fraction(v) => write!(f, "{}%", v * 100.0),
            Anchor::Px(px) => write!(f, "{px}px"),
        }
    }
}

fn parse_number(s: &str, input: &str) -> Result<f32> {
    let value: f32 = s
        .trim()
        .parse()
        .map_err(|_| TriggerError::syntax(input, "expected a keyword, percentage, or pixel value"))?;
    if !value.is_finite() {
        return Err(TriggerError::syntax(input, "value must be finite"));
    }
    Ok(value)
}

/// Where a point on the element meets a line across the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPosition {
    pub const fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Scroll position at which the element point reaches the viewport line
    pub fn scroll_offset(&self, bounds: Rect, viewport: Viewport) -> f32 {
        bounds.top() + self.element.resolve(bounds.height()) - self.viewport.resolve(viewport.height)
    }
}

impl FromStr for TriggerPosition {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(TriggerError::syntax(s, "expected \"<element> <viewport>\""));
        };
        Ok(Self {
            element: Anchor::parse(element, s)?,
            viewport: Anchor::parse(viewport, s)?,
        })
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// End of a trigger window
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerEnd {
    /// Absolute position, like the start
    At(TriggerPosition),
    /// Fixed distance past the start
    After(f32),
    /// Past the start by the horizontal overflow of a scroll container,
    /// re-measured on every refresh
    AfterScrollWidth(ElementId),
}

impl FromStr for TriggerEnd {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().strip_prefix("+=") {
            Some(rest) => {
                let px = rest.strip_suffix("px").unwrap_or(rest);
                let distance = parse_number(px, s)?;
                if distance < 0.0 {
                    return Err(TriggerError::syntax(s, "relative end must not be negative"));
                }
                Ok(TriggerEnd::After(distance))
            }
            None => s.parse().map(TriggerEnd::At),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        let pos: TriggerPosition = "top 80%".parse().unwrap();
        assert_eq!(pos.element, Anchor::TOP);
        assert_eq!(pos.viewport, Anchor::Fraction(0.8));

        let pos: TriggerPosition = "top top".parse().unwrap();
        assert_eq!(pos.viewport, Anchor::TOP);

        let pos: TriggerPosition = "center center".parse().unwrap();
        assert_eq!(pos, TriggerPosition::new(Anchor::CENTER, Anchor::CENTER));
    }

    #[test]
    fn test_parse_pixels() {
        let pos: TriggerPosition = "100px 50%".parse().unwrap();
        assert_eq!(pos.element, Anchor::Px(100.0));
        let pos: TriggerPosition = "-20 bottom".parse().unwrap();
        assert_eq!(pos.element, Anchor::Px(-20.0));
        assert_eq!(pos.viewport, Anchor::BOTTOM);
    }

    #[test]
    fn test_parse_errors() {
        assert!("top".parse::<TriggerPosition>().is_err());
        assert!("top 80% extra".parse::<TriggerPosition>().is_err());
        assert!("middle 50%".parse::<TriggerPosition>().is_err());
        assert!("top abc%".parse::<TriggerPosition>().is_err());
    }

    #[test]
    fn test_parse_end() {
        assert_eq!("+=600".parse::<TriggerEnd>().unwrap(), TriggerEnd::After(600.0));
        assert_eq!("+=600px".parse::<TriggerEnd>().unwrap(), TriggerEnd::After(600.0));
        assert!("+=-5".parse::<TriggerEnd>().is_err());
        assert!(matches!(
            "bottom 20%".parse::<TriggerEnd>().unwrap(),
            TriggerEnd::At(_)
        ));
    }

    #[test]
    fn test_scroll_offset() {
        let viewport = Viewport::new(1000.0, 1000.0);
        let bounds = Rect::new(0.0, 2000.0, 1000.0, 500.0);

        let start: TriggerPosition = "top 80%".parse().unwrap();
        assert_eq!(start.scroll_offset(bounds, viewport), 1200.0);

        let end: TriggerPosition = "bottom 20%".parse().unwrap();
        assert_eq!(end.scroll_offset(bounds, viewport), 2300.0);

        let pin: TriggerPosition = "top top".parse().unwrap();
        assert_eq!(pin.scroll_offset(bounds, viewport), 2000.0);
    }

    #[test]
    fn test_display_round_trips_keywords() {
        let pos: TriggerPosition = "top 80%".parse().unwrap();
        assert_eq!(pos.to_string(), "top 80%");
    }
}
