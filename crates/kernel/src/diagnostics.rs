use serde::Serialize;
use std::fmt;

/// Advisory stepping statistics. Nothing in the world reads these back for
/// control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// `1000 / elapsed` of the last step call that saw time pass.
    pub last_fps: f64,
    /// Whole timesteps covering the last observed elapsed time, before clamping.
    pub last_step_count: u32,
    /// Substeps executed since the world was created.
    pub total_substeps: u64,
    /// Step calls whose elapsed time exceeded the catch-up window.
    pub clamped_steps: u64,
    /// Wall-clock milliseconds discarded by clamping.
    pub dropped_time: f64,
}

impl Diagnostics {
    pub(crate) fn observe_elapsed(&mut self, elapsed: f64, fixed_timestep: f64) {
        self.last_fps = 1000.0 / elapsed;
        self.last_step_count = (elapsed / fixed_timestep).ceil() as u32;
    }

    pub(crate) fn record_clamp(&mut self, dropped: f64) {
        self.clamped_steps += 1;
        self.dropped_time += dropped;
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fps={:.1} last_steps={} total_substeps={} clamped={} dropped={:.1}ms",
            self.last_fps,
            self.last_step_count,
            self.total_substeps,
            self.clamped_steps,
            self.dropped_time
        )
    }
}
