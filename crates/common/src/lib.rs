//! Shared vocabulary for every glade crate.
//!
//! # Invariants
//! - `ObjectId`s are the only way crates refer to one another's objects.
//! - `Transform` composition is parent-first: `parent.compose(&child)`.

pub mod shape;
pub mod types;

pub use shape::{Material, Primitive};
pub use types::{ObjectId, Transform};
