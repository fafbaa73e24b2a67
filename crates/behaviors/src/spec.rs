use glam::DVec3;
use physstep_kernel::Behavior;
use serde::{Deserialize, Serialize};

use crate::{AnchorSpring, ConstantAcceleration, LinearDrag};

/// Declarative description of a stock behavior, as found in scene files.
///
/// ```yaml
/// - type: constant-acceleration
///   acceleration: [0.0, -0.0004, 0.0]
/// - type: linear-drag
///   coefficient: 0.001
///   class: ball
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum BehaviorSpec {
    ConstantAcceleration {
        acceleration: DVec3,
        #[serde(default)]
        class: Option<String>,
    },
    LinearDrag {
        coefficient: f64,
        #[serde(default)]
        class: Option<String>,
    },
    AnchorSpring {
        anchor: DVec3,
        stiffness: f64,
        #[serde(default)]
        damping: f64,
        #[serde(default)]
        class: Option<String>,
    },
}

impl BehaviorSpec {
    pub fn into_behavior(self) -> Box<dyn Behavior> {
        match self {
            Self::ConstantAcceleration {
                acceleration,
                class,
            } => Box::new(ConstantAcceleration {
                acceleration,
                class,
            }),
            Self::LinearDrag { coefficient, class } => Box::new(LinearDrag { coefficient, class }),
            Self::AnchorSpring {
                anchor,
                stiffness,
                damping,
                class,
            } => Box::new(AnchorSpring {
                anchor,
                stiffness,
                damping,
                class,
            }),
        }
    }
}
