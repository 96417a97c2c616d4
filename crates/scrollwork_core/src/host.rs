//! Host environment contract
//!
//! The engine never touches a real rendering tree. Everything it needs from
//! its environment goes through [`LayoutHost`]: viewport size, scroll
//! position, element geometry, and a sink for property writes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::ElementId;
use crate::error::CoreError;
use crate::geometry::Rect;
use crate::property::Property;

/// Visible area of the page
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Validated constructor
    pub fn try_new(width: f32, height: f32) -> crate::Result<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(CoreError::InvalidViewport { width, height })
        }
    }

    /// Offset from the viewport top of a line at `fraction` of its height
    pub fn line(&self, fraction: f32) -> f32 {
        self.height * fraction
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl FromStr for Viewport {
    type Err = CoreError;

    /// Parse `"1280x800"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| CoreError::ViewportSyntax(s.to_string()))?;
        let width = w
            .trim()
            .parse::<f32>()
            .map_err(|_| CoreError::ViewportSyntax(s.to_string()))?;
        let height = h
            .trim()
            .parse::<f32>()
            .map_err(|_| CoreError::ViewportSyntax(s.to_string()))?;
        Viewport::try_new(width, height)
    }
}

/// Horizontal overflow of a scroll container
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollExtent {
    /// Full laid-out width of the content
    pub content_width: f32,
    /// Visible width of the container
    pub client_width: f32,
}

impl ScrollExtent {
    pub const fn new(content_width: f32, client_width: f32) -> Self {
        Self {
            content_width,
            client_width,
        }
    }

    /// Distance the content can travel; may be zero or negative
    pub fn overflow(&self) -> f32 {
        self.content_width - self.client_width
    }
}

/// The environment an animation engine runs against
///
/// Elements that are not attached report `None` geometry; writes to them
/// must be ignored by the implementation.
pub trait LayoutHost {
    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Current vertical scroll position of the page
    fn scroll_y(&self) -> f32;

    /// Laid-out bounds of an element in document coordinates
    fn bounds(&self, id: ElementId) -> Option<Rect>;

    /// Horizontal scroll extent of a container element
    fn scroll_extent(&self, id: ElementId) -> Option<ScrollExtent>;

    /// Apply a visual property value
    fn write(&mut self, id: ElementId, property: Property, value: f32);

    /// Whether an element is currently attached
    fn is_attached(&self, id: ElementId) -> bool {
        self.bounds(id).is_some()
    }
}
