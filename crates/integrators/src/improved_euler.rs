use physstep_kernel::{Body, Integrator, StepError};

use crate::advance_free_bodies;

/// Improved Euler: the position update includes the half-acceleration term,
/// `x += v*dt + a*dt²/2`, so motion under constant acceleration is exact.
/// The default integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImprovedEuler;

impl ImprovedEuler {
    pub const NAME: &'static str = "improved-euler";

    pub fn boxed() -> Box<dyn Integrator> {
        Box::new(Self)
    }
}

impl Integrator for ImprovedEuler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn integrate(&mut self, dt: f64, bodies: &mut [Box<dyn Body>]) -> Result<(), StepError> {
        let half_dt_sq = 0.5 * dt * dt;
        advance_free_bodies(Self::NAME, bodies, |state| {
            let old_velocity = state.velocity;
            state.prev_position = Some(state.position);
            state.velocity += state.acceleration * dt;
            state.position += old_velocity * dt + state.acceleration * half_dt_sq;
        })
    }
}
