use glam::DVec3;
use physstep_kernel::{Behavior, Body, StepError};

use crate::for_each_target;

/// Damped spring pulling each target body toward a fixed point:
/// `F = -k * (x - anchor) - c * v`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSpring {
    pub anchor: DVec3,
    pub stiffness: f64,
    pub damping: f64,
    pub class: Option<String>,
}

impl AnchorSpring {
    pub const NAME: &'static str = "anchor-spring";

    pub fn new(anchor: DVec3, stiffness: f64) -> Self {
        Self {
            anchor,
            stiffness,
            damping: 0.0,
            class: None,
        }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn for_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

impl Behavior for AnchorSpring {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&mut self, bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
        let (anchor, k, c) = (self.anchor, self.stiffness, self.damping);
        for_each_target(bodies, self.class.as_deref(), |state| {
            let force = -(state.position - anchor) * k - state.velocity * c;
            state.apply_force(force);
        });
        Ok(())
    }
}
