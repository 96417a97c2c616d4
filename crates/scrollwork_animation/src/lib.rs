//! Scrollwork Animation
//!
//! Transitions, timed and scrubbed playback, and the physics used to smooth
//! scroll-driven progress.
//!
//! # Features
//!
//! - **Easing**: power-curve family (`power1`..`power3`, in/out/inOut)
//! - **Validated Transitions**: from/to [`VisualState`]s with identical keys
//! - **Batch Stagger**: element `i` starts `i * stagger` after the batch start
//! - **Players**: eased timed playback, linear scrubbing, repeat and yoyo
//! - **Timelines**: sequence tweens with append/overlap/absolute positions
//! - **Spring Physics**: RK4 springs used to lag scrubbed progress
//! - **Frame Scheduling**: deduplicated per-frame work queue keyed by slotmap ids

pub mod easing;
pub mod error;
pub mod player;
pub mod scheduler;
pub mod spring;
pub mod stagger;
pub mod timeline;
pub mod transition;
pub mod values;

pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use player::{Direction, Tween, TweenPlayer};
pub use scheduler::FrameScheduler;
pub use spring::{Spring, SpringConfig};
pub use stagger::BatchTiming;
pub use timeline::{Position, Timeline};
pub use transition::{Repeat, RepeatCount, TransitionBuilder, TransitionSpec};
pub use values::{Interpolate, VisualState};
