use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default substep size: one 60 Hz frame, in milliseconds.
pub const DEFAULT_FIXED_TIMESTEP: f64 = 1000.0 / 60.0;
/// Default bound on substeps executed by a single `World::step` call.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 4;
/// Integrator installed when the caller names none.
pub const DEFAULT_INTEGRATOR: &str = "improved-euler";

/// Caller-supplied overrides. Every field is optional; unset fields fall back
/// to the defaults when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_timestep: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_substeps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrator: Option<String>,
    /// Reserved for off-thread stepping. Accepted, never honored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offload_worker: Option<bool>,
}

impl WorldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed_timestep(mut self, dt: f64) -> Self {
        self.fixed_timestep = Some(dt);
        self
    }

    pub fn max_substeps(mut self, max: u32) -> Self {
        self.max_substeps = Some(max);
        self
    }

    pub fn integrator(mut self, name: impl Into<String>) -> Self {
        self.integrator = Some(name.into());
        self
    }

    pub fn offload_worker(mut self, enabled: bool) -> Self {
        self.offload_worker = Some(enabled);
        self
    }

    /// Merge these options over the built-in defaults and validate the result.
    pub fn resolve(&self) -> Result<WorldConfig, ConfigError> {
        let defaults = WorldConfig::default();
        let config = WorldConfig {
            fixed_timestep: self.fixed_timestep.unwrap_or(defaults.fixed_timestep),
            max_substeps: self.max_substeps.unwrap_or(defaults.max_substeps),
            integrator: self.integrator.clone().unwrap_or(defaults.integrator),
            offload_worker: self.offload_worker.unwrap_or(defaults.offload_worker),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Validated world configuration. Never mutated in place: changes produce a
/// new value that is validated before it replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldConfig {
    fixed_timestep: f64,
    max_substeps: u32,
    integrator: String,
    offload_worker: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            integrator: DEFAULT_INTEGRATOR.to_string(),
            offload_worker: false,
        }
    }
}

impl WorldConfig {
    /// Size of one substep in milliseconds.
    pub fn fixed_timestep(&self) -> f64 {
        self.fixed_timestep
    }

    pub fn max_substeps(&self) -> u32 {
        self.max_substeps
    }

    pub fn integrator(&self) -> &str {
        &self.integrator
    }

    pub fn offload_worker(&self) -> bool {
        self.offload_worker
    }

    /// Longest stretch of wall-clock time a single step call will simulate.
    pub fn max_catch_up(&self) -> f64 {
        self.fixed_timestep * f64::from(self.max_substeps)
    }

    /// Copy of this config with a different timestep.
    pub fn with_fixed_timestep(&self, dt: f64) -> Result<Self, ConfigError> {
        let config = Self {
            fixed_timestep: dt,
            ..self.clone()
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep > 0.0 && self.fixed_timestep.is_finite()) {
            return Err(ConfigError::NonPositiveTimestep(self.fixed_timestep));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::ZeroSubsteps);
        }
        Ok(())
    }
}
