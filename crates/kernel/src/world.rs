use std::rc::Rc;

use crate::behavior::Behavior;
use crate::body::Body;
use crate::config::{WorldConfig, WorldOptions};
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, StepError};
use crate::integrator::{Integrator, IntegratorFactory};
use crate::registry::{Entry, Registry};

/// Slack when counting whole timesteps in a span, so that a span which is an
/// exact multiple of the timestep up to rounding still counts in full.
const STEP_TOLERANCE: f64 = 1e-9;

/// Whether `World::step` advances the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

/// The simulation world.
///
/// Converts irregular wall-clock `step(now)` calls into a bounded run of
/// fixed-size substeps. Each substep applies the behavior pipeline and then
/// hands the fixed timestep and the body set to the integrator.
///
/// # Invariants
/// - An integrator is always installed.
/// - `max_catch_up == fixed_timestep * max_substeps`.
/// - The time anchor is unset or no later than the last `now` seen.
/// - While paused no substep runs and every step call clears the anchor.
pub struct World {
    registry: Registry,
    config: WorldConfig,
    factory: Rc<dyn IntegratorFactory>,
    time_anchor: Option<f64>,
    run_state: RunState,
    diagnostics: Diagnostics,
}

impl World {
    /// Build a world from `options` merged over the defaults, installing the
    /// integrator the configuration names.
    pub fn new(
        options: WorldOptions,
        factory: Rc<dyn IntegratorFactory>,
    ) -> Result<Self, ConfigError> {
        let config = options.resolve()?;
        let integrator = factory.create(config.integrator())?;
        if config.offload_worker() {
            tracing::debug!("offload_worker requested; stepping stays on the calling thread");
        }
        tracing::debug!(
            fixed_timestep = config.fixed_timestep(),
            max_substeps = config.max_substeps(),
            integrator = config.integrator(),
            "world created"
        );
        Ok(Self {
            registry: Registry::new(integrator),
            config,
            factory,
            time_anchor: None,
            run_state: RunState::Running,
            diagnostics: Diagnostics::default(),
        })
    }

    /// Like [`World::new`], then hands the world to `setup` once for
    /// registering bodies, behaviors, or a different integrator.
    pub fn with_setup<F>(
        options: WorldOptions,
        factory: Rc<dyn IntegratorFactory>,
        setup: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnOnce(&mut World),
    {
        let mut world = Self::new(options, factory)?;
        setup(&mut world);
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Re-merge `options` over the defaults and install a freshly resolved
    /// integrator, replacing whatever integrator was registered. On error the
    /// world is left untouched.
    pub fn configure(&mut self, options: WorldOptions) -> Result<(), ConfigError> {
        let config = options.resolve()?;
        let integrator = self.factory.create(config.integrator())?;
        self.registry.set_integrator(integrator);
        self.config = config;
        Ok(())
    }

    /// Size of one substep in milliseconds.
    pub fn fixed_timestep(&self) -> f64 {
        self.config.fixed_timestep()
    }

    /// Change the substep size. The catch-up window follows.
    pub fn set_fixed_timestep(&mut self, dt: f64) -> Result<(), ConfigError> {
        self.config = self.config.with_fixed_timestep(dt)?;
        tracing::debug!(
            fixed_timestep = dt,
            max_catch_up = self.config.max_catch_up(),
            "timestep changed"
        );
        Ok(())
    }

    pub fn max_catch_up(&self) -> f64 {
        self.config.max_catch_up()
    }

    /// Register a body, behavior, or integrator.
    pub fn add(&mut self, entry: impl Into<Entry>) -> &mut Self {
        self.registry.dispatch(entry.into());
        self
    }

    /// Register a batch, dispatching each entry in order.
    pub fn add_all<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = Entry>,
    {
        for entry in entries {
            self.registry.dispatch(entry);
        }
        self
    }

    pub fn add_body<B: Body + 'static>(&mut self, body: B) -> &mut Self {
        self.registry.add_body(Box::new(body));
        self
    }

    pub fn add_behavior<B: Behavior + 'static>(&mut self, behavior: B) -> &mut Self {
        self.registry.add_behavior(Box::new(behavior));
        self
    }

    /// Replace the integrator. The previous one is dropped.
    pub fn set_integrator<I: Integrator + 'static>(&mut self, integrator: I) -> &mut Self {
        self.registry.set_integrator(Box::new(integrator));
        self
    }

    /// Advance the simulation to wall-clock time `now` (milliseconds).
    ///
    /// The first call after construction or a pause only sets the time
    /// anchor. Later calls run one substep per whole fixed timestep between
    /// the anchor and `now`, at most `max_substeps` of them: elapsed time
    /// beyond the catch-up window is dropped. The fractional remainder
    /// carries over to the next call. Returns the number of substeps run.
    ///
    /// A failing behavior or integrator aborts the rest of the call. The
    /// anchor has already moved past the failed substep, so its interval is
    /// not retried; earlier substeps stay applied.
    pub fn step(&mut self, now: f64) -> Result<u32, StepError> {
        if !now.is_finite() {
            return Err(StepError::NonFiniteTime(now));
        }
        if self.run_state == RunState::Paused {
            self.time_anchor = None;
            return Ok(0);
        }
        let Some(mut anchor) = self.time_anchor else {
            self.time_anchor = Some(now);
            return Ok(0);
        };

        let elapsed = now - anchor;
        if elapsed == 0.0 {
            return Ok(0);
        }
        if elapsed < 0.0 {
            tracing::warn!(now, anchor, "step time went backwards; re-anchoring");
            self.time_anchor = Some(now);
            return Ok(0);
        }

        let _span = tracing::trace_span!("world_step", now, elapsed).entered();
        let dt = self.config.fixed_timestep();
        self.diagnostics.observe_elapsed(elapsed, dt);

        let max_catch_up = self.config.max_catch_up();
        if elapsed > max_catch_up {
            let dropped = elapsed - max_catch_up;
            tracing::warn!(elapsed, dropped, "simulation falling behind; dropping time");
            self.diagnostics.record_clamp(dropped);
            anchor = now - max_catch_up;
            self.time_anchor = Some(anchor);
        }

        let due = whole_steps(now - anchor, dt).min(self.config.max_substeps());
        for _ in 0..due {
            anchor = (anchor + dt).min(now);
            self.time_anchor = Some(anchor);
            self.substep()?;
            self.diagnostics.total_substeps += 1;
        }
        Ok(due)
    }

    fn substep(&mut self) -> Result<(), StepError> {
        let dt = self.config.fixed_timestep();
        let (bodies, pipeline, integrator) = self.registry.parts_mut();
        pipeline.run(bodies, dt)?;
        tracing::trace!(integrator = integrator.name(), dt, "integrating");
        integrator.integrate(dt, bodies)
    }

    pub fn pause(&mut self) -> &mut Self {
        if self.run_state != RunState::Paused {
            tracing::debug!("world paused");
        }
        self.run_state = RunState::Paused;
        self
    }

    pub fn unpause(&mut self) -> &mut Self {
        if self.run_state != RunState::Running {
            tracing::debug!("world resumed");
        }
        self.run_state = RunState::Running;
        self
    }

    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Bodies carrying `class`, in insertion order.
    pub fn bodies_with_class(&self, class: &str) -> Vec<&dyn Body> {
        self.registry.select(|b| b.has_class(class))
    }

    /// Bodies matching `predicate`, in insertion order.
    pub fn select<P>(&self, predicate: P) -> Vec<&dyn Body>
    where
        P: FnMut(&dyn Body) -> bool,
    {
        self.registry.select(predicate)
    }

    /// All bodies in insertion (integration) order.
    pub fn bodies(&self) -> &[Box<dyn Body>] {
        self.registry.bodies()
    }

    pub fn bodies_mut(&mut self) -> &mut [Box<dyn Body>] {
        self.registry.bodies_mut()
    }

    pub fn body_count(&self) -> usize {
        self.registry.bodies().len()
    }

    /// Behavior names in execution order.
    pub fn behavior_names(&self) -> Vec<&str> {
        self.registry.pipeline().names().collect()
    }

    pub fn integrator_name(&self) -> &str {
        self.registry.integrator().name()
    }

    /// Wall-clock time up to which the simulation has been advanced, if anchored.
    pub fn time_anchor(&self) -> Option<f64> {
        self.time_anchor
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

fn whole_steps(span: f64, dt: f64) -> u32 {
    (span / dt + STEP_TOLERANCE).floor() as u32
}
