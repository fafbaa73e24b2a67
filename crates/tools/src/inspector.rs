use glam::DVec3;
use physstep_common::BodyId;
use physstep_kernel::{Body, Diagnostics, World};
use serde::Serialize;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// World inspector for developer tooling.
///
/// Read-only queries against a world for debugging and reporting.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            paused: world.is_paused(),
            bodies: world.body_count(),
            behaviors: world.behavior_names().iter().map(|s| s.to_string()).collect(),
            integrator: world.integrator_name().to_string(),
            fixed_timestep: world.fixed_timestep(),
            max_substeps: world.config().max_substeps(),
            time_anchor: world.time_anchor(),
            kinetic_energy: Self::kinetic_energy(world),
            diagnostics: *world.diagnostics(),
        }
    }

    /// Detailed state of one body, if it is registered.
    pub fn inspect_body(world: &World, id: BodyId) -> Option<BodyInfo> {
        world
            .bodies()
            .iter()
            .find(|b| b.id() == id)
            .map(|b| BodyInfo::from_body(b.as_ref()))
    }

    /// All body ids in registration order.
    pub fn list_bodies(world: &World) -> Vec<BodyId> {
        world.bodies().iter().map(|b| b.id()).collect()
    }

    /// Total kinetic energy of bodies with finite mass.
    pub fn kinetic_energy(world: &World) -> f64 {
        world
            .bodies()
            .iter()
            .map(|b| b.state().kinetic_energy())
            .sum()
    }

    /// FNV-1a fingerprint over every body's position and velocity bits, in
    /// registration order. Identical simulations give identical hashes.
    pub fn state_hash(world: &World) -> u64 {
        let mut hash = FNV_OFFSET;
        for body in world.bodies() {
            let state = body.state();
            for v in [state.position, state.velocity] {
                for component in v.to_array() {
                    for byte in component.to_bits().to_le_bytes() {
                        hash ^= u64::from(byte);
                        hash = hash.wrapping_mul(FNV_PRIME);
                    }
                }
            }
        }
        hash
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub paused: bool,
    pub bodies: usize,
    pub behaviors: Vec<String>,
    pub integrator: String,
    pub fixed_timestep: f64,
    pub max_substeps: u32,
    pub time_anchor: Option<f64>,
    pub kinetic_energy: f64,
    pub diagnostics: Diagnostics,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let anchor = match self.time_anchor {
            Some(t) => format!("{t:.3}ms"),
            None => "unset".to_string(),
        };
        write!(
            f,
            "World: {} bodies={} behaviors=[{}] integrator={} dt={:.3}ms max_substeps={} anchor={} energy={:.6}",
            if self.paused { "paused" } else { "running" },
            self.bodies,
            self.behaviors.join(", "),
            self.integrator,
            self.fixed_timestep,
            self.max_substeps,
            anchor,
            self.kinetic_energy,
        )
    }
}

/// Detailed info about a single body.
#[derive(Debug, Clone, Serialize)]
pub struct BodyInfo {
    pub id: BodyId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub mass: f64,
    pub fixed: bool,
}

impl BodyInfo {
    fn from_body(body: &dyn Body) -> Self {
        let state = body.state();
        Self {
            id: body.id(),
            position: state.position,
            velocity: state.velocity,
            mass: state.mass(),
            fixed: state.fixed,
        }
    }
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Body [{:.8}] pos=({:.3}, {:.3}, {:.3}) vel=({:.4}, {:.4}, {:.4}) mass={}{}",
            &self.id.0.to_string()[..8],
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.mass,
            if self.fixed { " fixed" } else { "" },
        )
    }
}
