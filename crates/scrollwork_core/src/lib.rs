//! Scrollwork Core
//!
//! Foundational types shared by the Scrollwork animation engine:
//!
//! - **Geometry**: `Point`, `Size`, `Rect` in document coordinates
//! - **Visual Properties**: the closed set of animatable properties
//! - **Layout Host**: the contract the engine consumes from its environment
//!   (viewport, scroll position, element bounds, property writes)
//! - **Document**: an in-memory host for tests and headless simulation
//!
//! # Example
//!
//! ```rust
//! use scrollwork_core::{Document, LayoutHost, Property, Rect, Viewport};
//!
//! let mut doc = Document::new(Viewport::new(1280.0, 800.0));
//! let title = doc.insert("title", Rect::new(0.0, 900.0, 1280.0, 120.0));
//!
//! doc.write(title, Property::Opacity, 0.5);
//! assert_eq!(doc.style(title, Property::Opacity), Some(0.5));
//! ```

pub mod document;
pub mod error;
pub mod geometry;
pub mod host;
pub mod property;

pub use document::{Document, ElementId};
pub use error::{CoreError, Result};
pub use geometry::{Point, Rect, Size};
pub use host::{LayoutHost, ScrollExtent, Viewport};
pub use property::Property;
