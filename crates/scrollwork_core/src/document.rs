//! In-memory layout host
//!
//! `Document` is a flat arena of positioned elements with a viewport and a
//! scroll position. It stands in for a browser page in tests and in the
//! headless simulator: geometry is set explicitly, and every property write
//! the engine performs is recorded so it can be inspected.

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};

use crate::geometry::Rect;
use crate::host::{LayoutHost, ScrollExtent, Viewport};
use crate::property::Property;

new_key_type! {
    /// Handle to an element in a [`Document`]
    pub struct ElementId;
}

#[derive(Debug)]
struct Node {
    label: String,
    rect: Rect,
    /// Full content width for horizontal scroll containers
    content_width: Option<f32>,
    attached: bool,
    styles: IndexMap<Property, f32>,
}

/// A headless page
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<ElementId, Node>,
    viewport: Viewport,
    scroll_y: f32,
    /// Total number of accepted property writes
    writes: u64,
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            viewport,
            scroll_y: 0.0,
            writes: 0,
        }
    }

    /// Add an attached element with the given document-space bounds
    pub fn insert(&mut self, label: impl Into<String>, rect: Rect) -> ElementId {
        self.nodes.insert(Node {
            label: label.into(),
            rect,
            content_width: None,
            attached: true,
            styles: IndexMap::new(),
        })
    }

    /// Add a horizontal scroll container whose content is `content_width` wide
    pub fn insert_scroll_container(
        &mut self,
        label: impl Into<String>,
        rect: Rect,
        content_width: f32,
    ) -> ElementId {
        let id = self.insert(label, rect);
        if let Some(node) = self.nodes.get_mut(id) {
            node.content_width = Some(content_width);
        }
        id
    }

    /// Move or resize an element
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect = rect;
        }
    }

    /// Change the laid-out content width of a scroll container
    pub fn set_content_width(&mut self, id: ElementId, width: f32) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.content_width = Some(width);
        }
    }

    /// Detach an element without freeing its id
    pub fn detach(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attached = false;
        }
    }

    /// Re-attach a detached element
    pub fn attach(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.attached = true;
        }
    }

    /// Remove an element entirely
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.nodes.remove(id).is_some()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Set the page scroll position (never negative)
    pub fn set_scroll_y(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// Last written value of a property, if any
    pub fn style(&self, id: ElementId, property: Property) -> Option<f32> {
        self.nodes.get(id)?.styles.get(&property).copied()
    }

    /// Current value of a property, falling back to its identity
    pub fn resolved_style(&self, id: ElementId, property: Property) -> f32 {
        self.style(id, property).unwrap_or(property.identity())
    }

    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.label.as_str())
    }

    /// Number of property writes accepted so far
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Bottom of the lowest attached element
    pub fn page_height(&self) -> f32 {
        self.nodes
            .values()
            .filter(|n| n.attached)
            .map(|n| n.rect.bottom())
            .fold(0.0, f32::max)
    }

    /// Largest scroll position that still shows content
    pub fn max_scroll(&self) -> f32 {
        (self.page_height() - self.viewport.height).max(0.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl LayoutHost for Document {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(id).filter(|n| n.attached).map(|n| n.rect)
    }

    fn scroll_extent(&self, id: ElementId) -> Option<ScrollExtent> {
        let node = self.nodes.get(id).filter(|n| n.attached)?;
        let content_width = node.content_width.unwrap_or(node.rect.width());
        Some(ScrollExtent::new(content_width, node.rect.width()))
    }

    fn write(&mut self, id: ElementId, property: Property, value: f32) {
        match self.nodes.get_mut(id) {
            Some(node) if node.attached => {
                node.styles.insert(property, value);
                self.writes += 1;
            }
            _ => {
                tracing::trace!(?id, %property, "write to unattached element ignored");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let mut doc = Document::new(Viewport::new(800.0, 600.0));
        let id = doc.insert("card", Rect::new(0.0, 0.0, 100.0, 100.0));

        assert_eq!(doc.style(id, Property::Opacity), None);
        assert_eq!(doc.resolved_style(id, Property::Opacity), 1.0);

        doc.write(id, Property::Opacity, 0.25);
        assert_eq!(doc.style(id, Property::Opacity), Some(0.25));
        assert_eq!(doc.write_count(), 1);
    }

    #[test]
    fn test_detached_element_has_no_geometry() {
        let mut doc = Document::new(Viewport::new(800.0, 600.0));
        let id = doc.insert("card", Rect::new(0.0, 0.0, 100.0, 100.0));

        doc.detach(id);
        assert!(!doc.is_attached(id));
        assert!(doc.bounds(id).is_none());

        doc.write(id, Property::Opacity, 0.0);
        assert_eq!(doc.write_count(), 0);

        doc.attach(id);
        assert!(doc.is_attached(id));
    }

    #[test]
    fn test_removed_element_is_inert() {
        let mut doc = Document::new(Viewport::new(800.0, 600.0));
        let id = doc.insert("card", Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(doc.remove(id));
        assert!(!doc.remove(id));

        doc.write(id, Property::Scale, 2.0);
        assert_eq!(doc.write_count(), 0);
        assert!(doc.scroll_extent(id).is_none());
    }

    #[test]
    fn test_scroll_extent() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let strip = doc.insert_scroll_container("strip", Rect::new(0.0, 0.0, 1200.0, 400.0), 2400.0);
        assert_eq!(doc.scroll_extent(strip).map(|e| e.overflow()), Some(1200.0));

        doc.set_content_width(strip, 1000.0);
        assert_eq!(doc.scroll_extent(strip).map(|e| e.overflow()), Some(-200.0));
    }

    #[test]
    fn test_page_height_and_max_scroll() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        doc.insert("a", Rect::new(0.0, 0.0, 1200.0, 900.0));
        doc.insert("b", Rect::new(0.0, 900.0, 1200.0, 1100.0));
        assert_eq!(doc.page_height(), 2000.0);
        assert_eq!(doc.max_scroll(), 1200.0);

        doc.set_scroll_y(-40.0);
        assert_eq!(doc.scroll_y(), 0.0);
    }
}
