use glam::DVec3;
use physstep_kernel::{Behavior, Body, StepError};

use crate::for_each_target;

/// Uniform acceleration independent of mass, e.g. gravity near a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantAcceleration {
    pub acceleration: DVec3,
    pub class: Option<String>,
}

impl ConstantAcceleration {
    pub const NAME: &'static str = "constant-acceleration";

    pub fn new(acceleration: DVec3) -> Self {
        Self {
            acceleration,
            class: None,
        }
    }

    /// Restrict the behavior to bodies carrying `class`.
    pub fn for_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

impl Behavior for ConstantAcceleration {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&mut self, bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
        let acceleration = self.acceleration;
        for_each_target(bodies, self.class.as_deref(), |state| {
            state.accelerate(acceleration)
        });
        Ok(())
    }
}
