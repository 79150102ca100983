//! Developer tooling: session inspector.
//!
//! # Invariants
//! - Tools only read session state; they never mutate it.

pub mod inspector;

pub use inspector::{ObjectInfo, SessionInspector, SessionSummary, WorldStats};

pub fn crate_info() -> &'static str {
    "glade-tools v0.1.0"
}
