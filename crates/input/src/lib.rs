//! Input as recorded intent.
//!
//! # Invariants
//! - Recording an event never moves or rotates anything.
//! - Pointer deltas accumulate until the step that consumes them.

pub mod action;
pub mod bindings;
pub mod state;

pub use action::{InputEvent, MoveAction};
pub use bindings::KeyBindings;
pub use state::{InputState, MoveIntent};
