use std::fmt;

use crate::behavior::{Behavior, BehaviorPipeline};
use crate::body::Body;
use crate::integrator::Integrator;

/// Anything that can be registered with a world.
pub enum Entry {
    Body(Box<dyn Body>),
    Behavior(Box<dyn Behavior>),
    Integrator(Box<dyn Integrator>),
}

/// Kind tag of an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Body,
    Behavior,
    Integrator,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Body => "body",
            Self::Behavior => "behavior",
            Self::Integrator => "integrator",
        })
    }
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Body(_) => EntryKind::Body,
            Self::Behavior(_) => EntryKind::Behavior,
            Self::Integrator(_) => EntryKind::Integrator,
        }
    }
}

impl From<Box<dyn Body>> for Entry {
    fn from(body: Box<dyn Body>) -> Self {
        Self::Body(body)
    }
}

impl From<Box<dyn Behavior>> for Entry {
    fn from(behavior: Box<dyn Behavior>) -> Self {
        Self::Behavior(behavior)
    }
}

impl From<Box<dyn Integrator>> for Entry {
    fn from(integrator: Box<dyn Integrator>) -> Self {
        Self::Integrator(integrator)
    }
}

/// The world's registered parts: bodies in integration order, the behavior
/// pipeline, and the single integrator slot.
pub struct Registry {
    bodies: Vec<Box<dyn Body>>,
    pipeline: BehaviorPipeline,
    integrator: Box<dyn Integrator>,
}

impl Registry {
    pub fn new(integrator: Box<dyn Integrator>) -> Self {
        Self {
            bodies: Vec::new(),
            pipeline: BehaviorPipeline::new(),
            integrator,
        }
    }

    /// Route an entry to its collection by kind.
    pub fn dispatch(&mut self, entry: Entry) {
        match entry {
            Entry::Body(body) => self.add_body(body),
            Entry::Behavior(behavior) => self.add_behavior(behavior),
            Entry::Integrator(integrator) => {
                self.set_integrator(integrator);
            }
        }
    }

    pub fn add_body(&mut self, body: Box<dyn Body>) {
        tracing::debug!(index = self.bodies.len(), "registered body");
        self.bodies.push(body);
    }

    pub fn add_behavior(&mut self, behavior: Box<dyn Behavior>) {
        tracing::debug!(behavior = behavior.name(), "registered behavior");
        self.pipeline.push(behavior);
    }

    /// Install `integrator`, returning the one it replaces.
    pub fn set_integrator(&mut self, integrator: Box<dyn Integrator>) -> Box<dyn Integrator> {
        tracing::debug!(
            old = self.integrator.name(),
            new = integrator.name(),
            "replaced integrator"
        );
        std::mem::replace(&mut self.integrator, integrator)
    }

    pub fn bodies(&self) -> &[Box<dyn Body>] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Box<dyn Body>] {
        &mut self.bodies
    }

    pub fn pipeline(&self) -> &BehaviorPipeline {
        &self.pipeline
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// Split borrow for running a substep: the pipeline and integrator
    /// mutate the bodies they are handed.
    pub fn parts_mut(
        &mut self,
    ) -> (
        &mut [Box<dyn Body>],
        &mut BehaviorPipeline,
        &mut Box<dyn Integrator>,
    ) {
        (&mut self.bodies, &mut self.pipeline, &mut self.integrator)
    }

    /// Bodies matching `predicate`, in insertion order.
    pub fn select<P>(&self, mut predicate: P) -> Vec<&dyn Body>
    where
        P: FnMut(&dyn Body) -> bool,
    {
        self.bodies
            .iter()
            .map(|b| b.as_ref())
            .filter(|b| predicate(*b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Particle;
    use crate::error::StepError;
    use physstep_common::BodyState;

    struct Named(&'static str);

    impl Integrator for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn integrate(&mut self, _dt: f64, _bodies: &mut [Box<dyn Body>]) -> Result<(), StepError> {
            Ok(())
        }
    }

    impl Behavior for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn apply(&mut self, _bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
            Ok(())
        }
    }

    fn integrator(name: &'static str) -> Box<dyn Integrator> {
        Box::new(Named(name))
    }

    fn behavior(name: &'static str) -> Box<dyn Behavior> {
        Box::new(Named(name))
    }

    #[test]
    fn entries_report_their_kind() {
        let body: Entry = Particle::new(BodyState::default()).boxed().into();
        assert_eq!(body.kind(), EntryKind::Body);
        assert_eq!(Entry::from(behavior("b")).kind(), EntryKind::Behavior);
        assert_eq!(Entry::from(integrator("i")).kind(), EntryKind::Integrator);
        assert_eq!(EntryKind::Behavior.to_string(), "behavior");
    }

    #[test]
    fn dispatch_routes_by_kind() {
        let mut registry = Registry::new(integrator("first"));
        registry.dispatch(behavior("gravity").into());
        registry.dispatch(Particle::new(BodyState::default()).boxed().into());
        registry.dispatch(integrator("second").into());

        assert_eq!(registry.bodies().len(), 1);
        assert_eq!(registry.pipeline().names().collect::<Vec<_>>(), vec!["gravity"]);
        assert_eq!(registry.integrator().name(), "second");
    }

    #[test]
    fn set_integrator_hands_back_previous() {
        let mut registry = Registry::new(integrator("a"));
        let old = registry.set_integrator(integrator("b"));
        assert_eq!(old.name(), "a");
        assert_eq!(registry.integrator().name(), "b");
    }

    #[test]
    fn select_keeps_insertion_order() {
        let mut registry = Registry::new(integrator("i"));
        for x in [1.0, 2.0, 3.0, 4.0] {
            let state = BodyState::new(glam::DVec3::new(x, 0.0, 0.0), glam::DVec3::ZERO);
            registry.add_body(Particle::new(state).boxed());
        }
        let far: Vec<f64> = registry
            .select(|b| b.state().position.x > 1.5)
            .iter()
            .map(|b| b.state().position.x)
            .collect();
        assert_eq!(far, vec![2.0, 3.0, 4.0]);
    }
}
