//! Scrollwork Site
//!
//! The landing page wired to the Scrollwork engine, headless.
//!
//! # Sections
//!
//! - **Hero**: intro timeline with overlapping steps, a floating content
//!   loop, and an optional 3D embed that falls back to a placeholder
//! - **About**: title, copy and stats revealed at successively deeper
//!   trigger lines, then a staggered card batch
//! - **Events**: pinned section whose vertical scroll drives a horizontal
//!   card strip, smoothed with a one second lag
//! - **Team**, **Sponsors**, **Contact**: staggered one-shot reveals and
//!   per-logo floating loops
//! - **Circuit**: a fixed background overlay whose traces draw in with
//!   smoothed scroll scrub while their junction nodes pulse
//!
//! [`LandingPage`] owns the document and the binding registry;
//! [`Simulation`] scrolls it down and back up and reports what happened.

pub mod config;
pub mod embed;
pub mod error;
pub mod page;
pub mod sections;
pub mod sim;

pub use config::{ContentConfig, EmbedConfig, SimulationConfig, SiteConfig, UNSET_SCENE};
pub use embed::{EmbedError, EmbedLoader, EmbedSlot, EmbedState, NullEmbedLoader, Placeholder};
pub use error::{Result, SiteError};
pub use page::{LandingPage, Sections};
pub use sections::Section;
pub use sim::{SimReport, Simulation};
