//! Developer tooling: read-only world inspection and state fingerprints.
//!
//! Nothing here mutates a world; tools observe and report.

mod inspector;

pub use inspector::{BodyInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "physstep-tools v0.1.0"
}
