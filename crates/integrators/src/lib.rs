//! Stock integrators and the registry that resolves them by name.
//!
//! Every integrator here skips fixed bodies, records the pre-step position
//! as `prev_position`, and fails the step if a body ends up non-finite.

mod euler;
mod improved_euler;
mod verlet;

pub use euler::Euler;
pub use improved_euler::ImprovedEuler;
pub use verlet::Verlet;

use physstep_common::BodyState;
use physstep_kernel::{Body, ConfigError, Integrator, IntegratorFactory, StepError};
use std::collections::BTreeMap;
use std::rc::Rc;

pub fn crate_info() -> &'static str {
    "physstep-integrators v0.1.0"
}

/// Builds a fresh integrator instance.
pub type Constructor = fn() -> Box<dyn Integrator>;

/// Name-to-constructor table. Implements [`IntegratorFactory`], so it can be
/// handed to `World::new` directly.
#[derive(Debug, Clone, Default)]
pub struct IntegratorRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl IntegratorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `euler`, `improved-euler` and `verlet`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Euler::NAME, Euler::boxed);
        registry.register(ImprovedEuler::NAME, ImprovedEuler::boxed);
        registry.register(Verlet::NAME, Verlet::boxed);
        registry
    }

    /// Add or replace a constructor. Returns the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: Constructor,
    ) -> Option<Constructor> {
        self.constructors.insert(name.into(), constructor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn into_factory(self) -> Rc<dyn IntegratorFactory> {
        Rc::new(self)
    }
}

impl IntegratorFactory for IntegratorRegistry {
    fn create(&self, name: &str) -> Result<Box<dyn Integrator>, ConfigError> {
        match self.constructors.get(name) {
            Some(constructor) => {
                tracing::debug!(integrator = name, "resolved integrator");
                Ok(constructor())
            }
            None => Err(ConfigError::UnknownIntegrator {
                name: name.to_string(),
                available: self.constructors.keys().cloned().collect(),
            }),
        }
    }
}

/// Run `advance` on every non-fixed body, then check the result is finite.
pub(crate) fn advance_free_bodies<F>(
    integrator: &str,
    bodies: &mut [Box<dyn Body>],
    mut advance: F,
) -> Result<(), StepError>
where
    F: FnMut(&mut BodyState),
{
    for (index, body) in bodies.iter_mut().enumerate() {
        let state = body.state_mut();
        if state.fixed {
            continue;
        }
        advance(state);
        if !state.is_finite() {
            return Err(StepError::Integrator {
                integrator: integrator.to_string(),
                reason: format!("body {index} reached a non-finite state"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use glam::DVec3;
    use physstep_common::BodyState;
    use physstep_kernel::{Body, Particle};

    pub fn bodies(states: &[BodyState]) -> Vec<Box<dyn Body>> {
        states.iter().map(|s| Particle::new(*s).boxed()).collect()
    }

    pub fn falling(acceleration: DVec3) -> BodyState {
        let mut state = BodyState::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0));
        state.acceleration = acceleration;
        state
    }
}
