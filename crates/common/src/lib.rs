//! Shared body types: identifiers, class tags, and point-body kinematic state.

mod types;

pub use types::{BodyId, BodyState, ClassList};

pub fn crate_info() -> &'static str {
    "physstep-common v0.1.0"
}
