//! Landing page sections
//!
//! Each section creates its elements once, is placed by the page on every
//! layout pass, and registers its bindings under its own owner id when
//! mounted. Unmounting releases everything the section registered.

mod about;
mod circuit;
mod contact;
mod events;
mod hero;
mod sponsors;
mod team;

pub use about::About;
pub use circuit::Circuit;
pub use contact::Contact;
pub use events::Events;
pub use hero::Hero;
pub use sponsors::Sponsors;
pub use team::Team;

use scrollwork_animation::{Easing, TransitionSpec, VisualState};
use scrollwork_core::{Document, ElementId, Property, Rect, Viewport};
use scrollwork_trigger::{BindingHandle, BindingSpec, OwnerId, RegistryHandle, TriggerSpec};

use crate::error::Result;

/// Where every reveal window ends
pub(crate) const REVEAL_END: &str = "bottom 20%";

/// A page section driven by the binding registry
pub trait Section {
    /// Owner id for this section's bindings
    fn owner(&self) -> OwnerId;

    /// Laid-out height, not counting pin spacing
    fn height(&self, viewport: Viewport) -> f32;

    /// Position the section and its children with its top at `top`
    fn place(&self, doc: &mut Document, top: f32);

    /// Register this section's bindings
    fn mount(&mut self, doc: &mut Document, registry: &RegistryHandle) -> Result<()>;

    /// Bindings registered by the last mount
    fn handles(&self) -> &[BindingHandle];

    /// Release this section's bindings; returns how many were released
    fn unmount(&mut self, registry: &RegistryHandle) -> usize {
        registry.release_all(self.owner())
    }

    /// Extra height below the section while it is pinned
    fn pin_spacing(&self, _doc: &Document) -> f32 {
        0.0
    }
}

/// `{distance, 0 opacity}` to `{0, 1 opacity}` along `axis`
pub(crate) fn rise(axis: Property, distance: f32) -> (VisualState, VisualState) {
    (
        VisualState::new()
            .with(axis, distance)
            .with(Property::Opacity, 0.0),
        VisualState::new()
            .with(axis, 0.0)
            .with(Property::Opacity, 1.0),
    )
}

/// The standard section title reveal
pub(crate) fn title_reveal() -> Result<TransitionSpec> {
    let (from, to) = rise(Property::TranslateY, 50.0);
    Ok(TransitionSpec::builder(from, to)
        .duration_secs(1.0)
        .easing(Easing::QuartOut)
        .build()?)
}

/// Registers one section's bindings under its owner id
pub(crate) struct Mounter<'a> {
    doc: &'a mut Document,
    registry: &'a RegistryHandle,
    owner: OwnerId,
    handles: Vec<BindingHandle>,
}

impl<'a> Mounter<'a> {
    pub(crate) fn new(doc: &'a mut Document, registry: &'a RegistryHandle, owner: OwnerId) -> Self {
        Self {
            doc,
            registry,
            owner,
            handles: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, spec: BindingSpec) -> BindingHandle {
        let handle = self.registry.register(&mut *self.doc, self.owner.clone(), spec);
        self.handles.push(handle.clone());
        handle
    }

    /// One-shot reveal of `targets` when `section` crosses `start`
    pub(crate) fn reveal(
        &mut self,
        section: ElementId,
        start: &str,
        transition: TransitionSpec,
        targets: impl IntoIterator<Item = ElementId>,
        label: &str,
    ) -> Result<BindingHandle> {
        let trigger = TriggerSpec::parse(section, start, REVEAL_END)?;
        Ok(self.register(BindingSpec::triggered(trigger, transition, targets).named(label)))
    }

    pub(crate) fn finish(self) -> Vec<BindingHandle> {
        self.handles
    }
}

/// Insert `count` elements labelled `"{prefix}-{i}"`
pub(crate) fn insert_many(doc: &mut Document, prefix: &str, count: usize) -> Vec<ElementId> {
    (0..count)
        .map(|i| doc.insert(format!("{prefix}-{i}"), Rect::ZERO))
        .collect()
}

/// Lay `items` out in rows of `columns`, starting at `top`
pub(crate) fn place_grid(
    doc: &mut Document,
    items: &[ElementId],
    top: f32,
    viewport: Viewport,
    columns: usize,
    row_height: f32,
) {
    let columns = columns.max(1);
    let cell_width = viewport.width / columns as f32;
    for (i, &item) in items.iter().enumerate() {
        let row = (i / columns) as f32;
        let col = (i % columns) as f32;
        doc.set_rect(
            item,
            Rect::new(col * cell_width, top + row * row_height, cell_width, row_height * 0.9),
        );
    }
}

/// Rows needed for `count` items in `columns`
pub(crate) fn rows(count: usize, columns: usize) -> f32 {
    count.div_ceil(columns.max(1)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollwork_core::LayoutHost;

    #[test]
    fn test_rise() {
        let (from, to) = rise(Property::TranslateX, -50.0);
        assert_eq!(from.get(Property::TranslateX), Some(-50.0));
        assert_eq!(from.get(Property::Opacity), Some(0.0));
        assert_eq!(to.get(Property::TranslateX), Some(0.0));
        assert_eq!(to.get(Property::Opacity), Some(1.0));
    }

    #[test]
    fn test_grid() {
        let mut doc = Document::new(Viewport::new(1200.0, 800.0));
        let items = insert_many(&mut doc, "card", 5);
        place_grid(&mut doc, &items, 100.0, Viewport::new(1200.0, 800.0), 3, 200.0);

        let last = doc.bounds(items[4]).unwrap();
        assert_eq!(last.x(), 400.0);
        assert_eq!(last.y(), 300.0);
        assert_eq!(rows(5, 3), 2.0);
        assert_eq!(rows(0, 3), 0.0);
    }
}
