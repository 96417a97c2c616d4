//! Transition specifications
//!
//! A [`TransitionSpec`] describes *what* changes: from-state, to-state,
//! duration, easing, per-item stagger, group delay and repetition. Specs are
//! validated once at construction so malformed ones never reach a player.
//!
//! # Example
//!
//! ```rust
//! use scrollwork_animation::{Easing, TransitionSpec, VisualState};
//! use scrollwork_core::Property;
//!
//! let spec = TransitionSpec::builder(
//!     VisualState::new().with(Property::TranslateY, 50.0).with(Property::Opacity, 0.0),
//!     VisualState::new().with(Property::TranslateY, 0.0).with(Property::Opacity, 1.0),
//! )
//! .duration_secs(0.8)
//! .easing(Easing::QuartOut)
//! .stagger_secs(0.2)
//! .build()
//! .unwrap();
//!
//! assert_eq!(spec.stagger_ms(), 200.0);
//! ```

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::values::VisualState;

/// How many extra cycles follow the first one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatCount {
    #[default]
    None,
    Finite(u32),
    Infinite,
}

/// Repetition behaviour of a timed transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Repeat {
    pub count: RepeatCount,
    /// Alternate direction on every other cycle
    pub yoyo: bool,
}

impl Repeat {
    /// Loop forever, reversing direction each cycle
    pub fn infinite_yoyo() -> Self {
        Self {
            count: RepeatCount::Infinite,
            yoyo: true,
        }
    }

    /// Whether another cycle may start after `completed` cycles have finished
    pub fn allows_cycle(&self, completed: u32) -> bool {
        match self.count {
            RepeatCount::None => false,
            RepeatCount::Finite(n) => completed <= n,
            RepeatCount::Infinite => true,
        }
    }
}

/// A validated from/to transition
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionSpec {
    from: VisualState,
    to: VisualState,
    duration_ms: f32,
    easing: Easing,
    stagger_ms: f32,
    delay_ms: f32,
    repeat: Repeat,
}

impl TransitionSpec {
    /// Start building a transition (defaults: 500ms, linear, no stagger)
    pub fn builder(from: VisualState, to: VisualState) -> TransitionBuilder {
        TransitionBuilder {
            spec: TransitionSpec {
                from,
                to,
                duration_ms: 500.0,
                easing: Easing::Linear,
                stagger_ms: 0.0,
                delay_ms: 0.0,
                repeat: Repeat::default(),
            },
        }
    }

    pub fn from_state(&self) -> &VisualState {
        &self.from
    }

    pub fn to_state(&self) -> &VisualState {
        &self.to
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn stagger_ms(&self) -> f32 {
        self.stagger_ms
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// State at eased local progress `t` in [0, 1]
    pub fn sample(&self, eased: f32) -> VisualState {
        use crate::values::Interpolate;
        self.from.lerp(&self.to, eased)
    }

    fn validate(&self) -> Result<()> {
        if self.from.is_empty() && self.to.is_empty() {
            return Err(AnimationError::EmptyState);
        }

        let only_from = self.from.missing_from(&self.to);
        let only_to = self.to.missing_from(&self.from);
        if !only_from.is_empty() || !only_to.is_empty() {
            return Err(AnimationError::KeyMismatch { only_from, only_to });
        }

        for (property, value) in self.from.iter().chain(self.to.iter()) {
            if !value.is_finite() {
                return Err(AnimationError::NonFinite { property, value });
            }
        }

        for (field, value) in [
            ("duration", self.duration_ms),
            ("stagger", self.stagger_ms),
            ("delay", self.delay_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnimationError::InvalidTiming { field, value });
            }
        }

        Ok(())
    }
}

/// Builder for [`TransitionSpec`]
#[derive(Clone, Debug)]
pub struct TransitionBuilder {
    spec: TransitionSpec,
}

impl TransitionBuilder {
    pub fn duration_ms(mut self, ms: f32) -> Self {
        self.spec.duration_ms = ms;
        self
    }

    pub fn duration_secs(self, secs: f32) -> Self {
        self.duration_ms(secs * 1000.0)
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.spec.easing = easing;
        self
    }

    /// Delay added per item in a batch
    pub fn stagger_ms(mut self, ms: f32) -> Self {
        self.spec.stagger_ms = ms;
        self
    }

    pub fn stagger_secs(self, secs: f32) -> Self {
        self.stagger_ms(secs * 1000.0)
    }

    /// Delay before the whole batch starts
    pub fn delay_ms(mut self, ms: f32) -> Self {
        self.spec.delay_ms = ms;
        self
    }

    pub fn delay_secs(self, secs: f32) -> Self {
        self.delay_ms(secs * 1000.0)
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.spec.repeat = repeat;
        self
    }

    /// Validate and finish
    pub fn build(self) -> Result<TransitionSpec> {
        self.spec.validate()?;
        Ok(self.spec)
    }
}
