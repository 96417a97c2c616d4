//! Binding registry
//!
//! The registry is the page-lifetime owner of every live binding. Sections
//! receive a [`RegistryHandle`], register bindings under their [`OwnerId`],
//! and release them all on unmount. The host forwards scroll, resize, and
//! per-frame ticks to the registry, which routes them to bindings.
//!
//! Handles are weak: once the registry is dropped, every operation through a
//! [`RegistryHandle`] or [`BindingHandle`] does nothing. Released bindings are
//! removed outright, so late frames or scroll events find nothing to write.
//!
//! Crossing listeners run while the registry is locked and must not call
//! back into it.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rustc_hash::FxHashMap;
use scrollwork_animation::FrameScheduler;
use scrollwork_core::LayoutHost;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::binding::{Binding, BindingSpec, BindingState};
use crate::tracker::{IntersectionTracker, ObserverId};

new_key_type! {
    /// Identifies a registered binding
    pub struct BindingId;
}

/// The section (or other owner) a binding belongs to
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for OwnerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal state of the registry
#[derive(Debug, Default)]
struct RegistryInner {
    bindings: SlotMap<BindingId, Binding>,
    owners: FxHashMap<OwnerId, SmallVec<[BindingId; 8]>>,
    by_observer: FxHashMap<ObserverId, BindingId>,
    tracker: IntersectionTracker,
    frames: FrameScheduler<BindingId>,
    released: u64,
}

impl RegistryInner {
    fn register<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        owner: OwnerId,
        spec: BindingSpec,
    ) -> BindingId {
        let (binding, listener) = Binding::new(spec);
        let id = self.bindings.insert(binding);
        self.owners.entry(owner.clone()).or_default().push(id);

        let Some(binding) = self.bindings.get_mut(id) else {
            return id;
        };
        let wants_frame = binding.activate(host, &mut self.tracker, listener);
        let observer = binding.observer();
        debug!(%owner, binding = binding.label(), ?id, "binding registered");

        if let Some(observer_id) = observer.id() {
            self.by_observer.insert(observer_id, id);
            // Apply the current scroll position right away so a binding
            // registered below its start line plays immediately.
            if let Some(update) = self.tracker.update_one(observer, host.scroll_y()) {
                if binding.on_sample(host, &update.sample) {
                    self.frames.request(id);
                }
            }
        }
        if wants_frame {
            self.frames.request(id);
        }
        id
    }

    fn release(&mut self, id: BindingId) -> bool {
        let Some(mut binding) = self.bindings.remove(id) else {
            return false;
        };
        if let Some(observer_id) = binding.observer().id() {
            self.by_observer.remove(&observer_id);
        }
        binding.release(&mut self.tracker);
        self.frames.cancel(id);
        self.released += 1;
        true
    }

    fn release_all(&mut self, owner: &OwnerId) -> usize {
        let Some(ids) = self.owners.remove(owner) else {
            return 0;
        };
        let count = ids.into_iter().filter(|id| self.release(*id)).count();
        debug!(%owner, count, "released owner bindings");
        count
    }

    fn release_everything(&mut self) -> usize {
        let ids: Vec<BindingId> = self.bindings.keys().collect();
        let count = ids.into_iter().filter(|id| self.release(*id)).count();
        self.owners.clear();
        self.by_observer.clear();
        self.tracker.clear();
        self.frames.clear();
        debug!(count, "released all bindings");
        count
    }

    fn forget(&mut self, id: BindingId) -> bool {
        if !self.release(id) {
            return false;
        }
        for ids in self.owners.values_mut() {
            ids.retain(|other| *other != id);
        }
        self.owners.retain(|_, ids| !ids.is_empty());
        true
    }

    fn on_scroll<H: LayoutHost + ?Sized>(&mut self, host: &mut H, scroll: f32) {
        for update in self.tracker.update(scroll) {
            let Some(&id) = self.by_observer.get(&update.observer) else {
                continue;
            };
            let Some(binding) = self.bindings.get_mut(id) else {
                continue;
            };
            if binding.on_sample(host, &update.sample) {
                self.frames.request(id);
            }
        }
    }

    fn refresh<H: LayoutHost + ?Sized>(&mut self, host: &mut H) {
        for (_, binding) in self.bindings.iter_mut() {
            binding.refresh(host, &mut self.tracker);
        }
        trace!(bindings = self.bindings.len(), "windows refreshed");
        let scroll = host.scroll_y();
        self.on_scroll(host, scroll);
    }

    fn tick<H: LayoutHost + ?Sized>(&mut self, host: &mut H, dt: f32) -> bool {
        for id in self.frames.take_frame() {
            // Re-check liveness before every write; the frame may have been
            // queued before a release.
            let Some(binding) = self.bindings.get_mut(id) else {
                continue;
            };
            if !binding.is_active() {
                continue;
            }
            if binding.tick(host, dt) {
                self.frames.request(id);
            }
        }
        !self.frames.is_idle()
    }
}

fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Page-lifetime collection of live bindings
///
/// ```rust
/// use scrollwork_animation::{TransitionSpec, VisualState};
/// use scrollwork_core::{Document, Property, Rect, Viewport};
/// use scrollwork_trigger::{BindingRegistry, BindingSpec, TriggerSpec};
///
/// let mut doc = Document::new(Viewport::new(1000.0, 1000.0));
/// let title = doc.insert("about-title", Rect::new(0.0, 2000.0, 1000.0, 200.0));
///
/// let registry = BindingRegistry::new();
/// let fade = TransitionSpec::builder(
///     VisualState::new().with(Property::Opacity, 0.0),
///     VisualState::new().with(Property::Opacity, 1.0),
/// )
/// .duration_secs(1.0)
/// .build()
/// .unwrap();
/// let trigger = TriggerSpec::parse(title, "top 80%", "bottom 20%").unwrap();
/// registry.register(&mut doc, "about", BindingSpec::triggered(trigger, fade, [title]));
///
/// registry.on_scroll(&mut doc, 1500.0);
/// while registry.tick(&mut doc, 1.0 / 60.0) {}
/// assert_eq!(doc.style(title, Property::Opacity), Some(1.0));
///
/// assert_eq!(registry.release_all("about"), 1);
/// assert_eq!(registry.release_all("about"), 0);
/// ```
pub struct BindingRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner::default())),
        }
    }

    /// Weak handle for sections
    pub fn handle(&self) -> RegistryHandle {
        RegistryHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Create a binding owned by `owner`
    pub fn register<H: LayoutHost + ?Sized>(
        &self,
        host: &mut H,
        owner: impl Into<OwnerId>,
        spec: BindingSpec,
    ) -> BindingHandle {
        let id = lock(&self.inner).register(host, owner.into(), spec);
        BindingHandle {
            id: Some(id),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Release every binding owned by `owner`; returns how many were released
    pub fn release_all(&self, owner: impl Into<OwnerId>) -> usize {
        lock(&self.inner).release_all(&owner.into())
    }

    /// Release every binding; the registry stays usable
    pub fn release_everything(&self) -> usize {
        lock(&self.inner).release_everything()
    }

    /// Deliver the latest scroll position
    pub fn on_scroll<H: LayoutHost + ?Sized>(&self, host: &mut H, scroll: f32) {
        lock(&self.inner).on_scroll(host, scroll);
    }

    /// Deliver a viewport resize; call after the host reports the new size
    pub fn on_resize<H: LayoutHost + ?Sized>(&self, host: &mut H) {
        debug!(viewport = ?host.viewport(), "resize");
        lock(&self.inner).refresh(host);
    }

    /// Re-measure pins and re-resolve every trigger window after a layout
    /// change, then re-apply the current scroll position
    pub fn refresh<H: LayoutHost + ?Sized>(&self, host: &mut H) {
        lock(&self.inner).refresh(host);
    }

    /// Run one frame; returns `true` while any binding still needs frames
    pub fn tick<H: LayoutHost + ?Sized>(&self, host: &mut H, dt: f32) -> bool {
        lock(&self.inner).tick(host, dt)
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        lock(&self.inner).bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).bindings.is_empty()
    }

    /// Number of owners with at least one live binding
    pub fn owner_count(&self) -> usize {
        lock(&self.inner).owners.len()
    }

    /// Live bindings owned by `owner`
    pub fn bindings_for(&self, owner: impl Into<OwnerId>) -> usize {
        lock(&self.inner)
            .owners
            .get(&owner.into())
            .map_or(0, |ids| ids.len())
    }

    /// Number of live tracker observers
    pub fn live_observers(&self) -> usize {
        lock(&self.inner).tracker.len()
    }

    /// Bindings waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        lock(&self.inner).frames.pending_len()
    }

    /// Total bindings released over the registry's lifetime
    pub fn released_total(&self) -> u64 {
        lock(&self.inner).released
    }

    /// Combined extra document height of all active pins
    pub fn pin_spacing(&self) -> f32 {
        lock(&self.inner)
            .bindings
            .values()
            .filter_map(|b| b.pin())
            .map(|pin| pin.spacing())
            .sum()
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("BindingRegistry")
            .field("bindings", &inner.bindings.len())
            .field("owners", &inner.owners.len())
            .field("observers", &inner.tracker.len())
            .finish()
    }
}

/// A weak handle to the registry
///
/// Passed to sections. It won't keep the registry alive; once the registry is
/// gone every call is a no-op.
#[derive(Clone, Debug)]
pub struct RegistryHandle {
    inner: Weak<Mutex<RegistryInner>>,
}

impl RegistryHandle {
    /// A handle that was never attached to a registry
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Create a binding; returns an unregistered handle if the registry is gone
    pub fn register<H: LayoutHost + ?Sized>(
        &self,
        host: &mut H,
        owner: impl Into<OwnerId>,
        spec: BindingSpec,
    ) -> BindingHandle {
        let id = self
            .inner
            .upgrade()
            .map(|inner| lock(&inner).register(host, owner.into(), spec));
        BindingHandle {
            id,
            registry: self.inner.clone(),
        }
    }

    pub fn release_all(&self, owner: impl Into<OwnerId>) -> usize {
        self.inner
            .upgrade()
            .map_or(0, |inner| lock(&inner).release_all(&owner.into()))
    }

    pub fn release_everything(&self) -> usize {
        self.inner
            .upgrade()
            .map_or(0, |inner| lock(&inner).release_everything())
    }
}

/// Handle to one registered binding
#[derive(Clone, Debug)]
pub struct BindingHandle {
    id: Option<BindingId>,
    registry: Weak<Mutex<RegistryInner>>,
}

impl BindingHandle {
    pub fn id(&self) -> Option<BindingId> {
        self.id
    }

    fn with<R>(&self, f: impl FnOnce(&mut RegistryInner, BindingId) -> R) -> Option<R> {
        let id = self.id?;
        let inner = self.registry.upgrade()?;
        let mut guard = lock(&inner);
        Some(f(&mut *guard, id))
    }

    /// Lifecycle state; a binding whose registry is gone reads as released
    pub fn state(&self) -> BindingState {
        if self.id.is_none() {
            return BindingState::Unregistered;
        }
        self.with(|inner, id| inner.bindings.get(id).map(|b| b.state()))
            .flatten()
            .unwrap_or(BindingState::Released)
    }

    pub fn is_active(&self) -> bool {
        self.state() == BindingState::Active
    }

    /// Progress last applied to the motion
    pub fn progress(&self) -> Option<f32> {
        self.with(|inner, id| inner.bindings.get(id).map(|b| b.progress()))
            .flatten()
    }

    /// Whether a one-shot binding has started playing
    pub fn has_played_forward(&self) -> bool {
        self.with(|inner, id| inner.bindings.get(id).map(|b| b.has_played_forward()))
            .flatten()
            .unwrap_or(false)
    }

    /// Extra document height this binding's pin occupies, if it is a pin
    pub fn pin_spacing(&self) -> Option<f32> {
        self.with(|inner, id| inner.bindings.get(id).and_then(|b| b.pin()).map(|p| p.spacing()))
            .flatten()
    }

    /// Whether this binding's pin is currently holding its section
    pub fn is_pinned(&self) -> bool {
        self.with(|inner, id| inner.bindings.get(id).and_then(|b| b.pin()).map(|p| p.is_pinned()))
            .flatten()
            .unwrap_or(false)
    }

    /// Return to the from-state so a one-shot can play again
    pub fn reset<H: LayoutHost + ?Sized>(&self, host: &mut H) {
        self.with(|inner, id| {
            inner.frames.cancel(id);
            if let Some(binding) = inner.bindings.get_mut(id) {
                binding.reset(host);
            }
        });
    }

    /// Release just this binding; returns `false` if it was already gone
    pub fn release(&self) -> bool {
        self.with(|inner, id| inner.forget(id)).unwrap_or(false)
    }
}
