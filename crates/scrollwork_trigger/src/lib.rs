//! Scrollwork Triggers
//!
//! Scroll-position driven animation: where a binding starts and ends, how
//! far through its window the page has scrolled, and who owns it.
//!
//! # Features
//!
//! - **Trigger Positions**: `"top 80%"`, `"bottom 20%"`, `"top top"`, `"+=600"`
//! - **Intersection Tracker**: clamped, linear window progress with crossing events
//! - **Scrub Modes**: one-shot, immediate, and spring-smoothed scrubbing
//! - **Pinning**: vertical scroll remapped onto a horizontal strip
//! - **Binding Registry**: owner-scoped registration, idempotent release,
//!   weak handles that go inert once the registry is gone
//!
//! The host drives everything: it forwards scroll positions, resizes and
//! frame ticks to a [`BindingRegistry`], which writes visual properties back
//! through [`scrollwork_core::LayoutHost`].

pub mod binding;
pub mod error;
pub mod pin;
pub mod position;
pub mod registry;
pub mod tracker;
pub mod trigger;

pub use binding::{BindingSpec, BindingState, MotionSpec};
pub use error::{Result, TriggerError};
pub use pin::PinSequence;
pub use position::{Anchor, TriggerEnd, TriggerPosition};
pub use registry::{BindingHandle, BindingId, BindingRegistry, OwnerId, RegistryHandle};
pub use tracker::{EventListener, IntersectionTracker, ObserverHandle, ObserverId, Update};
pub use trigger::{Sample, Scrub, TriggerEvent, TriggerSpec, TriggerWindow};
