//! Scene host adapter: the narrow surface glade drives.
//!
//! # Invariants
//! - The host renders and owns its own scene graph; glade never reads
//!   world truth back from it except through `object_position`.
//! - Rotations cross this boundary as XYZ Euler angles in radians.
//!
//! `RecordingHost` implements the trait in memory so sessions can run
//! headless in tests and from the CLI.

mod host;
mod recording;

pub use host::{HostError, ObjectSpec, SceneHost, UniformTarget, UniformValue};
pub use recording::{HostCommand, HostObject, RecordingHost};

pub fn crate_info() -> &'static str {
    "glade-host v0.1.0"
}
