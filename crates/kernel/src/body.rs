use physstep_common::{BodyId, BodyState, ClassList};
use serde::{Deserialize, Serialize};

/// A simulated entity.
///
/// The world owns bodies and hands them to behaviors and the integrator as a
/// slice in insertion order. Only the integrator should advance `position`
/// and `velocity`; behaviors write the acceleration accumulator.
pub trait Body {
    fn id(&self) -> BodyId;

    /// Whether this body carries the given class tag.
    fn has_class(&self, class: &str) -> bool;

    fn state(&self) -> &BodyState;

    fn state_mut(&mut self) -> &mut BodyState;
}

/// The stock point-mass body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    #[serde(default)]
    pub id: BodyId,
    #[serde(default)]
    pub classes: ClassList,
    pub state: BodyState,
}

impl Particle {
    pub fn new(state: BodyState) -> Self {
        Self {
            id: BodyId::new(),
            classes: ClassList::new(),
            state,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class);
        self
    }

    pub fn boxed(self) -> Box<dyn Body> {
        Box::new(self)
    }
}

impl Body for Particle {
    fn id(&self) -> BodyId {
        self.id
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }
}
