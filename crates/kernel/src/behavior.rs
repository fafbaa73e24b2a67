use crate::body::Body;
use crate::error::StepError;

/// A force or state generator run against every body once per substep.
pub trait Behavior {
    fn name(&self) -> &str;

    /// Contribute to the bodies' acceleration accumulators for the coming
    /// substep of length `dt`. Behaviors should add to `acceleration` rather
    /// than replace it; earlier behaviors have already written their share.
    fn apply(&mut self, bodies: &mut [Box<dyn Body>], dt: f64) -> Result<(), StepError>;
}

/// Ordered list of behaviors.
///
/// Each run clears every body's acceleration accumulator, then applies the
/// behaviors in registration order. Later behaviors see what earlier ones
/// wrote during the same run.
#[derive(Default)]
pub struct BehaviorPipeline {
    behaviors: Vec<Box<dyn Behavior>>,
}

impl BehaviorPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, behavior: Box<dyn Behavior>) {
        self.behaviors.push(behavior);
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Behavior names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.behaviors.iter().map(|b| b.name())
    }

    /// Stops at the first failing behavior; the ones after it do not run.
    pub fn run(&mut self, bodies: &mut [Box<dyn Body>], dt: f64) -> Result<(), StepError> {
        for body in bodies.iter_mut() {
            body.state_mut().clear_acceleration();
        }
        for behavior in &mut self.behaviors {
            tracing::trace!(behavior = behavior.name(), "applying behavior");
            behavior.apply(bodies, dt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Particle;
    use glam::DVec3;
    use physstep_common::BodyState;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Push(DVec3);

    impl Behavior for Push {
        fn name(&self) -> &str {
            "push"
        }

        fn apply(&mut self, bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
            for body in bodies {
                body.state_mut().accelerate(self.0);
            }
            Ok(())
        }
    }

    /// Records the acceleration it observes on the first body.
    struct Observe(Rc<RefCell<Vec<DVec3>>>);

    impl Behavior for Observe {
        fn name(&self) -> &str {
            "observe"
        }

        fn apply(&mut self, bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
            self.0.borrow_mut().push(bodies[0].state().acceleration);
            Ok(())
        }
    }

    struct Fail;

    impl Behavior for Fail {
        fn name(&self) -> &str {
            "fail"
        }

        fn apply(&mut self, _bodies: &mut [Box<dyn Body>], _dt: f64) -> Result<(), StepError> {
            Err(StepError::Behavior {
                behavior: "fail".into(),
                reason: "always fails".into(),
            })
        }
    }

    fn one_body() -> Vec<Box<dyn Body>> {
        vec![Particle::new(BodyState::default()).boxed()]
    }

    #[test]
    fn contributions_accumulate_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = BehaviorPipeline::new();
        pipeline.push(Box::new(Push(DVec3::X)));
        pipeline.push(Box::new(Observe(seen.clone())));
        pipeline.push(Box::new(Push(DVec3::Y)));

        let mut bodies = one_body();
        pipeline.run(&mut bodies, 16.0).unwrap();

        assert_eq!(*seen.borrow(), vec![DVec3::X]);
        assert_eq!(bodies[0].state().acceleration, DVec3::X + DVec3::Y);
    }

    #[test]
    fn accumulator_is_cleared_every_run() {
        let mut pipeline = BehaviorPipeline::new();
        pipeline.push(Box::new(Push(DVec3::X)));

        let mut bodies = one_body();
        bodies[0].state_mut().acceleration = DVec3::splat(100.0);
        pipeline.run(&mut bodies, 16.0).unwrap();
        pipeline.run(&mut bodies, 16.0).unwrap();

        assert_eq!(bodies[0].state().acceleration, DVec3::X);
    }

    #[test]
    fn empty_pipeline_still_clears() {
        let mut pipeline = BehaviorPipeline::new();
        let mut bodies = one_body();
        bodies[0].state_mut().acceleration = DVec3::ONE;
        pipeline.run(&mut bodies, 16.0).unwrap();
        assert_eq!(bodies[0].state().acceleration, DVec3::ZERO);
    }

    #[test]
    fn failure_stops_later_behaviors() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = BehaviorPipeline::new();
        pipeline.push(Box::new(Fail));
        pipeline.push(Box::new(Observe(seen.clone())));

        let mut bodies = one_body();
        let err = pipeline.run(&mut bodies, 16.0).unwrap_err();
        assert!(matches!(err, StepError::Behavior { .. }));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn names_follow_registration_order() {
        let mut pipeline = BehaviorPipeline::new();
        pipeline.push(Box::new(Fail));
        pipeline.push(Box::new(Push(DVec3::ZERO)));
        assert_eq!(pipeline.names().collect::<Vec<_>>(), vec!["fail", "push"]);
        assert_eq!(pipeline.len(), 2);
    }
}
