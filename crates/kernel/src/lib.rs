//! World kernel: fixed-timestep stepping of bodies through a behavior
//! pipeline and a pluggable integrator.
//!
//! # Invariants
//! - Integrators only ever see the configured fixed timestep, never the
//!   caller's wall-clock delta.
//! - One `step` call runs at most `max_substeps` substeps.
//! - Bodies and behaviors keep registration order.

pub mod behavior;
pub mod body;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod registry;
pub mod world;

pub use behavior::{Behavior, BehaviorPipeline};
pub use body::{Body, Particle};
pub use config::{
    DEFAULT_FIXED_TIMESTEP, DEFAULT_INTEGRATOR, DEFAULT_MAX_SUBSTEPS, WorldConfig, WorldOptions,
};
pub use diagnostics::Diagnostics;
pub use error::{ConfigError, StepError};
pub use integrator::{Integrator, IntegratorFactory};
pub use registry::{Entry, EntryKind};
pub use world::{RunState, World};

pub fn crate_info() -> &'static str {
    "physstep-kernel v0.1.0"
}
