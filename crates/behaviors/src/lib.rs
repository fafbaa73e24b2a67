//! Stock behaviors. Each one adds its contribution to the acceleration
//! accumulator of the bodies it targets and never touches position or
//! velocity. Fixed bodies are skipped.

mod drag;
mod gravity;
mod spec;
mod spring;

pub use drag::LinearDrag;
pub use gravity::ConstantAcceleration;
pub use spec::BehaviorSpec;
pub use spring::AnchorSpring;

use physstep_common::BodyState;
use physstep_kernel::Body;

pub fn crate_info() -> &'static str {
    "physstep-behaviors v0.1.0"
}

/// Visit the state of every non-fixed body that carries `class`, or every
/// non-fixed body when `class` is `None`.
pub(crate) fn for_each_target<F>(bodies: &mut [Box<dyn Body>], class: Option<&str>, mut f: F)
where
    F: FnMut(&mut BodyState),
{
    for body in bodies.iter_mut() {
        if class.is_some_and(|c| !body.has_class(c)) {
            continue;
        }
        let state = body.state_mut();
        if !state.fixed {
            f(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use physstep_kernel::Particle;

    #[test]
    fn class_filter_and_fixed_bodies() {
        let mut bodies: Vec<Box<dyn Body>> = vec![
            Particle::new(BodyState::default()).with_class("a").boxed(),
            Particle::new(BodyState::default()).boxed(),
            Particle::new(BodyState::default().fixed()).with_class("a").boxed(),
        ];
        for_each_target(&mut bodies, Some("a"), |s| s.accelerate(DVec3::X));
        let hits: Vec<DVec3> = bodies.iter().map(|b| b.state().acceleration).collect();
        assert_eq!(hits, vec![DVec3::X, DVec3::ZERO, DVec3::ZERO]);

        for_each_target(&mut bodies, None, |s| s.accelerate(DVec3::Y));
        let hits: Vec<DVec3> = bodies.iter().map(|b| b.state().acceleration).collect();
        assert_eq!(hits, vec![DVec3::X + DVec3::Y, DVec3::Y, DVec3::ZERO]);
    }
}
