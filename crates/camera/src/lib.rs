//! Camera controller.
//!
//! # Invariants
//! - Stored pitch stays strictly inside (-π/2, π/2).
//! - forward, right and up are orthonormal after every orientation update.
//! - A step whose movement or look delta is not finite leaves the pose untouched.
//! - The camera's pose lives in the transform graph; the controller mirrors it.

pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod waypoint;

pub use config::{CameraConfig, PitchInput};
pub use controller::{CameraController, CameraMode, CameraTransition};
pub use error::CameraError;
pub use state::CameraState;
pub use waypoint::{OrbitPath, Waypoint, WaypointList, WaypointPolicy};
