//! Tween Engine: animated moves of graph nodes toward a target.
//!
//! # Invariants
//! - At most one active tween per object; a new one replaces the old and the
//!   old one's callbacks never fire.
//! - "Nearing end" and "completed" each fire at most once per tween.
//! - On completion the node is pinned to the exact target.
//! - The engine only updates existing graph nodes; it never creates them.

mod easing;
mod engine;

pub use easing::{Easing, ParseEasingError, cubic_bezier};
pub use engine::{
    DEFAULT_NEAR_END_THRESHOLD, TweenCallback, TweenEngine, TweenError, TweenRequest, TweenUpdate,
};
