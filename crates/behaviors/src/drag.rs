use physstep_kernel::{Behavior, Body, StepError};

use crate::for_each_target;

/// Force opposing motion, proportional to velocity: `F = -c * v`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDrag {
    pub coefficient: f64,
    pub class: Option<String>,
}

impl LinearDrag {
    pub const NAME: &'static str = "linear-drag";

    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient,
            class: None,
        }
    }

    pub fn for_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

impl Behavior for LinearDrag {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&mut self, bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
        if !(self.coefficient >= 0.0 && self.coefficient.is_finite()) {
            return Err(StepError::Behavior {
                behavior: Self::NAME.to_string(),
                reason: format!(
                    "drag coefficient {} is not a finite non-negative number",
                    self.coefficient
                ),
            });
        }
        let c = self.coefficient;
        for_each_target(bodies, self.class.as_deref(), |state| {
            let force = -state.velocity * c;
            state.apply_force(force);
        });
        Ok(())
    }
}
