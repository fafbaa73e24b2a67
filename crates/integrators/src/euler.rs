use physstep_kernel::{Body, Integrator, StepError};

use crate::advance_free_bodies;

/// Explicit (forward) Euler: position moves with the old velocity, then the
/// velocity picks up the acceleration. First order; drifts on oscillators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl Euler {
    pub const NAME: &'static str = "euler";

    pub fn boxed() -> Box<dyn Integrator> {
        Box::new(Self)
    }
}

impl Integrator for Euler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn integrate(&mut self, dt: f64, bodies: &mut [Box<dyn Body>]) -> Result<(), StepError> {
        advance_free_bodies(Self::NAME, bodies, |state| {
            state.prev_position = Some(state.position);
            state.position += state.velocity * dt;
            state.velocity += state.acceleration * dt;
        })
    }
}
