/// Errors raised while building or reconfiguring a world.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("fixed timestep must be positive and finite, got {0}")]
    NonPositiveTimestep(f64),
    #[error("max substeps must be at least 1")]
    ZeroSubsteps,
    #[error("unknown integrator `{name}` (available: {})", available.join(", "))]
    UnknownIntegrator { name: String, available: Vec<String> },
}

/// Errors raised from inside `World::step`.
///
/// A behavior or integrator failure aborts the remaining substeps of the
/// call that hit it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("behavior `{behavior}` failed: {reason}")]
    Behavior { behavior: String, reason: String },
    #[error("integrator `{integrator}` failed: {reason}")]
    Integrator { integrator: String, reason: String },
    #[error("step called with non-finite time {0}")]
    NonFiniteTime(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_integrator_lists_alternatives() {
        let err = ConfigError::UnknownIntegrator {
            name: "rk4".into(),
            available: vec!["euler".into(), "verlet".into()],
        };
        assert_eq!(
            err.to_string(),
            "unknown integrator `rk4` (available: euler, verlet)"
        );
    }

    #[test]
    fn step_error_names_the_culprit() {
        let err = StepError::Behavior {
            behavior: "gravity".into(),
            reason: "boom".into(),
        };
        assert!(err.to_string().contains("gravity"));
    }
}
