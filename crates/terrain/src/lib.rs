//! Procedural world generation.
//!
//! A seeded [`NoiseField`] is sampled into a [`HeightMap`] of stepped column
//! levels, which the [`TerrainBuilder`] turns into [`PlacementDirective`]s for
//! terrain blocks, water fill, and decorations.
//!
//! # Invariants
//! - Generation is a pure function of [`TerrainConfig`]; identical configs give
//!   identical height maps, directives, and object ids.
//! - Every column level is at most one step above each processed neighbour.
//! - A failed build returns an error and no partial world.

mod builder;
mod decoration;
mod directive;
mod error;
mod heightmap;
mod noise;
mod registry;

pub use builder::{MAX_LEVEL, Palette, TerrainBuilder, TerrainConfig, WorldBuild};
pub use decoration::DecorationKind;
pub use directive::{DirectiveKind, PlacementDirective, TerrainLayer};
pub use error::TerrainError;
pub use heightmap::HeightMap;
pub use noise::NoiseField;
pub use registry::DecorationRegistry;
