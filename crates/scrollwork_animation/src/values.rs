//! Animatable value types
//!
//! [`VisualState`] is the structured replacement for free-form property bags:
//! an ordered set of `Property → f32` pairs. Transitions interpolate between
//! two states with identical key sets.

use scrollwork_core::{ElementId, LayoutHost, Property};
use smallvec::SmallVec;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

/// A set of visual property values, kept sorted by property
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualState {
    values: SmallVec<[(Property, f32); 4]>,
}

impl VisualState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property (builder pattern)
    pub fn with(mut self, property: Property, value: f32) -> Self {
        self.set(property, value);
        self
    }

    /// Insert or replace a property value
    pub fn set(&mut self, property: Property, value: f32) {
        match self.values.binary_search_by(|(p, _)| p.cmp(&property)) {
            Ok(i) => self.values[i].1 = value,
            Err(i) => self.values.insert(i, (property, value)),
        }
    }

    pub fn get(&self, property: Property) -> Option<f32> {
        self.values
            .binary_search_by(|(p, _)| p.cmp(&property))
            .ok()
            .map(|i| self.values[i].1)
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.values.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, f32)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Properties present here but missing from `other`
    pub fn missing_from(&self, other: &VisualState) -> Vec<Property> {
        self.properties()
            .filter(|p| other.get(*p).is_none())
            .collect()
    }

    /// Write every value to an element
    pub fn apply<H: LayoutHost + ?Sized>(&self, host: &mut H, target: ElementId) {
        for (property, value) in self.iter() {
            host.write(target, property, value);
        }
    }
}

impl Interpolate for VisualState {
    /// Interpolates keys present in both states; others keep `self`'s value
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let values = self
            .values
            .iter()
            .map(|&(p, a)| match other.get(p) {
                Some(b) => (p, a.lerp(&b, t)),
                None => (p, a),
            })
            .collect();
        Self { values }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(p, a)| other.get(p).is_some_and(|b| a.approx_eq(&b, epsilon)))
    }
}

impl FromIterator<(Property, f32)> for VisualState {
    fn from_iter<I: IntoIterator<Item = (Property, f32)>>(iter: I) -> Self {
        let mut state = VisualState::new();
        for (p, v) in iter {
            state.set(p, v);
        }
        state
    }
}
