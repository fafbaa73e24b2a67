use physstep_kernel::{Body, Integrator, StepError};

use crate::advance_free_bodies;

/// Position Verlet: `x' = 2x - x_prev + a*dt²`, with velocity recovered as
/// `(x' - x) / dt`. A body without history seeds it from its velocity.
///
/// The history assumes a constant timestep; changing it mid-run costs one
/// step of accuracy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verlet;

impl Verlet {
    pub const NAME: &'static str = "verlet";

    pub fn boxed() -> Box<dyn Integrator> {
        Box::new(Self)
    }
}

impl Integrator for Verlet {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn integrate(&mut self, dt: f64, bodies: &mut [Box<dyn Body>]) -> Result<(), StepError> {
        let dt_sq = dt * dt;
        advance_free_bodies(Self::NAME, bodies, |state| {
            let current = state.position;
            let prev = state
                .prev_position
                .unwrap_or(current - state.velocity * dt);
            let next = current * 2.0 - prev + state.acceleration * dt_sq;
            state.velocity = (next - current) / dt;
            state.prev_position = Some(current);
            state.position = next;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use glam::DVec3;

    #[test]
    fn seeds_history_from_velocity() {
        let mut bodies = testing::bodies(&[testing::falling(DVec3::ZERO)]);
        Verlet.integrate(4.0, &mut bodies).unwrap();
        let state = bodies[0].state();
        assert_eq!(state.position, DVec3::new(4.0, 0.0, 0.0));
        assert_eq!(state.velocity, DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(state.prev_position, Some(DVec3::ZERO));
    }

    #[test]
    fn spring_oscillation_stays_bounded() {
        // a = -k x with k = 0.01; Verlet keeps the amplitude near 1.
        let k = 0.01;
        let mut bodies = testing::bodies(&[physstep_common::BodyState::new(
            DVec3::X,
            DVec3::ZERO,
        )]);
        let mut max_amplitude: f64 = 0.0;
        for _ in 0..2000 {
            let x = bodies[0].state().position;
            bodies[0].state_mut().acceleration = -x * k;
            Verlet.integrate(1.0, &mut bodies).unwrap();
            max_amplitude = max_amplitude.max(bodies[0].state().position.length());
        }
        assert!(max_amplitude < 1.05, "amplitude grew to {max_amplitude}");
    }
}
