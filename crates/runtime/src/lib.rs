//! Session runtime: the single owner of all mutable glade state.
//!
//! # Invariants
//! - Input handlers only record intent; poses change inside [`Session::step`].
//! - Each step issues at most one position, rotation and scale call per
//!   changed object, after all sub-calculations are done.
//! - A failed world build leaves neither graph nodes nor host objects behind.

mod config;
mod error;
mod flush;
mod session;

pub use config::SessionConfig;
pub use error::RuntimeError;
pub use flush::FlushStats;
pub use session::{BuiltWorld, Session, StepReport};
