use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Unique identifier for a body in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub Uuid);

impl BodyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::new()
    }
}

/// Set of class tags a body answers to in class queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassList(BTreeSet<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    /// Add a class. Returns false if it was already present.
    pub fn insert(&mut self, class: impl Into<String>) -> bool {
        self.0.insert(class.into())
    }

    pub fn remove(&mut self, class: &str) -> bool {
        self.0.remove(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Kinematic state of a point body.
///
/// `acceleration` is an accumulator: it is cleared at the start of every
/// substep and behaviors add into it before the integrator reads it.
/// `prev_position` is integrator history and is never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: DVec3,
    pub velocity: DVec3,
    #[serde(default)]
    pub acceleration: DVec3,
    #[serde(skip)]
    pub prev_position: Option<DVec3>,
    /// Zero for bodies with infinite mass.
    pub inverse_mass: f64,
    /// Fixed bodies are never moved by an integrator.
    #[serde(default)]
    pub fixed: bool,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            acceleration: DVec3::ZERO,
            prev_position: None,
            inverse_mass: 1.0,
            fixed: false,
        }
    }
}

impl BodyState {
    /// Unit-mass state at `position` moving with `velocity`.
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self {
            position,
            velocity,
            ..Default::default()
        }
    }

    /// Set the mass. Non-positive or infinite masses make the body immovable
    /// by forces (inverse mass zero).
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.inverse_mass = if mass > 0.0 && mass.is_finite() {
            1.0 / mass
        } else {
            0.0
        };
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn mass(&self) -> f64 {
        if self.inverse_mass > 0.0 {
            1.0 / self.inverse_mass
        } else {
            f64::INFINITY
        }
    }

    /// Add an acceleration directly, independent of mass.
    pub fn accelerate(&mut self, acceleration: DVec3) {
        self.acceleration += acceleration;
    }

    /// Add a force, scaled by the inverse mass.
    pub fn apply_force(&mut self, force: DVec3) {
        self.acceleration += force * self.inverse_mass;
    }

    pub fn clear_acceleration(&mut self) {
        self.acceleration = DVec3::ZERO;
    }

    pub fn kinetic_energy(&self) -> f64 {
        if self.inverse_mass > 0.0 {
            0.5 * self.velocity.length_squared() / self.inverse_mass
        } else {
            0.0
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }
}
