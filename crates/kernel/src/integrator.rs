use crate::body::Body;
use crate::error::{ConfigError, StepError};

/// Numerical method advancing body kinematics by a fixed time delta.
pub trait Integrator {
    fn name(&self) -> &str;

    /// Advance every body by exactly `dt` milliseconds, reading each body's
    /// accumulated acceleration.
    fn integrate(&mut self, dt: f64, bodies: &mut [Box<dyn Body>]) -> Result<(), StepError>;
}

/// Resolves integrator names to fresh instances.
///
/// Injected into the world at construction so that configuration can name an
/// integrator without any global lookup table.
pub trait IntegratorFactory {
    fn create(&self, name: &str) -> Result<Box<dyn Integrator>, ConfigError>;
}

impl<F> IntegratorFactory for F
where
    F: Fn(&str) -> Result<Box<dyn Integrator>, ConfigError>,
{
    fn create(&self, name: &str) -> Result<Box<dyn Integrator>, ConfigError> {
        self(name)
    }
}
