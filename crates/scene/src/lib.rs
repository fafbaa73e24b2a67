//! Scene files: a declarative world setup (options, bodies, behaviors) in
//! JSON or YAML, chosen by file extension.
//!
//! ```yaml
//! world:
//!   fixed_timestep: 10.0
//!   integrator: verlet
//! bodies:
//!   - position: [0.0, 100.0, 0.0]
//!     velocity: [0.05, 0.0, 0.0]
//!     classes: [ball]
//! behaviors:
//!   - type: constant-acceleration
//!     acceleration: [0.0, -0.0004, 0.0]
//! ```

use glam::DVec3;
use physstep_behaviors::BehaviorSpec;
use physstep_common::BodyState;
use physstep_kernel::{ConfigError, IntegratorFactory, Particle, World, WorldOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;

/// Errors from loading, saving, or instantiating a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported scene format `{0}` (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
    #[error("invalid world configuration: {0}")]
    Config(#[from] ConfigError),
}

/// On-disk encoding of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Json,
    Yaml,
}

impl SceneFormat {
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            other => Err(SceneError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// One body in a scene. Unset mass means unit mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodySpec {
    pub position: DVec3,
    #[serde(default)]
    pub velocity: DVec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl BodySpec {
    pub fn to_particle(&self) -> Particle {
        let mut state = BodyState::new(self.position, self.velocity);
        if let Some(mass) = self.mass {
            state = state.with_mass(mass);
        }
        state.fixed = self.fixed;
        let mut particle = Particle::new(state);
        for class in &self.classes {
            particle.classes.insert(class.as_str());
        }
        particle
    }
}

/// A complete world description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scene {
    pub world: WorldOptions,
    pub bodies: Vec<BodySpec>,
    pub behaviors: Vec<BehaviorSpec>,
}

impl Scene {
    /// Load a scene, picking the parser from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        let data = std::fs::read_to_string(path)?;
        let scene = Self::parse(&data, format)?;
        tracing::debug!(
            path = %path.display(),
            bodies = scene.bodies.len(),
            behaviors = scene.behaviors.len(),
            "loaded scene"
        );
        Ok(scene)
    }

    pub fn parse(data: &str, format: SceneFormat) -> Result<Self, SceneError> {
        Ok(match format {
            SceneFormat::Json => serde_json::from_str(data)?,
            SceneFormat::Yaml => serde_yaml::from_str(data)?,
        })
    }

    /// Save the scene, picking the encoding from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        let file = std::fs::File::create(path)?;
        match format {
            SceneFormat::Json => serde_json::to_writer_pretty(file, self)?,
            SceneFormat::Yaml => serde_yaml::to_writer(file, self)?,
        }
        Ok(())
    }

    /// Instantiate a world: bodies first, then behaviors, in file order.
    pub fn build(&self, factory: Rc<dyn IntegratorFactory>) -> Result<World, SceneError> {
        let world = World::with_setup(self.world.clone(), factory, |world| {
            for body in &self.bodies {
                world.add_body(body.to_particle());
            }
            for behavior in &self.behaviors {
                world.add(behavior.clone().into_behavior());
            }
        })?;
        Ok(world)
    }

    /// Built-in demo: a row of balls under gravity and light drag, one of
    /// them tethered to a spring, and a fixed post.
    pub fn demo() -> Self {
        let mut bodies: Vec<BodySpec> = (0..5)
            .map(|i| BodySpec {
                position: DVec3::new(i as f64 * 20.0, 200.0, 0.0),
                velocity: DVec3::new(0.01 * i as f64, 0.0, 0.0),
                mass: Some(1.0 + i as f64),
                fixed: false,
                classes: vec!["ball".into()],
            })
            .collect();
        bodies.push(BodySpec {
            position: DVec3::new(50.0, 300.0, 0.0),
            velocity: DVec3::ZERO,
            mass: Some(2.0),
            fixed: false,
            classes: vec!["tethered".into()],
        });
        bodies.push(BodySpec {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            mass: None,
            fixed: true,
            classes: vec!["post".into()],
        });
        Self {
            world: WorldOptions::default(),
            bodies,
            behaviors: vec![
                BehaviorSpec::ConstantAcceleration {
                    acceleration: DVec3::new(0.0, -0.0004, 0.0),
                    class: None,
                },
                BehaviorSpec::LinearDrag {
                    coefficient: 0.0005,
                    class: Some("ball".into()),
                },
                BehaviorSpec::AnchorSpring {
                    anchor: DVec3::new(50.0, 250.0, 0.0),
                    stiffness: 0.0002,
                    damping: 0.001,
                    class: Some("tethered".into()),
                },
            ],
        }
    }
}

pub fn crate_info() -> &'static str {
    "physstep-scene v0.1.0"
}
