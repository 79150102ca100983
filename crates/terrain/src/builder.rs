use std::f32::consts::TAU;

use glade_common::{Material, Primitive};
use glam::{IVec3, Vec3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::decoration::{self, DecorationKind};
use crate::directive::{DirectiveKind, DirectiveSink, Placement, PlacementDirective, TerrainLayer};
use crate::error::TerrainError;
use crate::heightmap::HeightMap;
use crate::noise::{NoiseField, splitmix64};
use crate::registry::DecorationRegistry;

/// Materials handed to the host for each kind of placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub surface: Material,
    pub subsurface: Material,
    pub core: Material,
    pub water: Material,
    pub trunk: Material,
    pub leaves: Material,
    pub crystal: Material,
    pub rainbow: Material,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            surface: Material::new("grass", [0.2, 0.6, 0.2]),
            subsurface: Material::new("dirt", [0.45, 0.3, 0.2]),
            core: Material::new("stone", [0.5, 0.5, 0.52]),
            water: Material::new("water", [0.1, 0.3, 0.5]).with_opacity(0.6),
            trunk: Material::new("wood", [0.4, 0.26, 0.13]),
            leaves: Material::new("leaves", [0.15, 0.5, 0.15]),
            crystal: Material::new("crystal", [0.6, 0.4, 0.8]).with_emission(0.5),
            rainbow: Material::new("rainbow", [1.0, 0.0, 0.0]),
        }
    }
}

/// Highest column level, and highest water level, a config may produce.
pub const MAX_LEVEL: i32 = 256;

/// World generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Cells along each side of the square world.
    pub world_size: usize,
    /// Horizontal size of one cell in world units.
    pub cell_size: f32,
    pub octaves: u32,
    /// Phase seed for the noise field; `None` uses the unperturbed field.
    pub seed: Option<u64>,
    pub base_frequency: f64,
    /// Mean terrain height in world units.
    pub base_height: f32,
    /// Peak deviation from `base_height` in world units.
    pub amplitude: f32,
    /// Vertical size of one block layer.
    pub layer_height: f32,
    /// Round heights to layers and smooth cliffs. Otherwise heights are floored.
    pub quantize: bool,
    /// Level up to which low columns are filled with water.
    pub water_level: i32,
    /// Blocks beneath the surface that use the subsurface material.
    pub subsurface_depth: i32,
    /// Per-column decoration probability for columns above water.
    pub decoration_chance: f64,
    /// Rainbows placed above the highest column.
    pub rainbow_count: usize,
    pub palette: Palette,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            world_size: 16,
            cell_size: 1.0,
            octaves: 3,
            seed: None,
            base_frequency: 0.2,
            base_height: 4.0,
            amplitude: 4.0,
            layer_height: 1.0,
            quantize: true,
            water_level: 3,
            subsurface_depth: 3,
            decoration_chance: 0.03,
            rainbow_count: 0,
            palette: Palette::default(),
        }
    }
}

impl TerrainConfig {
    fn validate(&self) -> Result<(), TerrainError> {
        if self.world_size == 0 {
            return Err(TerrainError::invalid("world_size", "must be at least 1"));
        }
        if self.octaves == 0 {
            return Err(TerrainError::invalid("octaves", "must be at least 1"));
        }
        for (name, value) in [
            ("cell_size", self.cell_size),
            ("layer_height", self.layer_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TerrainError::invalid(
                    name,
                    format!("must be finite and positive, got {value}"),
                ));
            }
        }
        if !self.base_height.is_finite() || !self.amplitude.is_finite() {
            return Err(TerrainError::invalid("amplitude", "heights must be finite"));
        }
        // Noise stays within [-1, 1], so this bounds every column.
        let peak = (self.base_height + self.amplitude.abs()) / self.layer_height;
        if !peak.is_finite() || peak > MAX_LEVEL as f32 {
            return Err(TerrainError::invalid(
                "amplitude",
                format!("peak level {peak} exceeds {MAX_LEVEL}"),
            ));
        }
        if self.water_level > MAX_LEVEL {
            return Err(TerrainError::invalid(
                "water_level",
                format!("must be at most {MAX_LEVEL}, got {}", self.water_level),
            ));
        }
        if !(0.0..=1.0).contains(&self.decoration_chance) {
            return Err(TerrainError::invalid(
                "decoration_chance",
                format!("must be within [0, 1], got {}", self.decoration_chance),
            ));
        }
        if self.subsurface_depth < 0 {
            return Err(TerrainError::invalid("subsurface_depth", "must not be negative"));
        }
        Ok(())
    }
}

/// Output of a successful build.
#[derive(Debug, Clone)]
pub struct WorldBuild {
    pub heightmap: HeightMap,
    pub directives: Vec<PlacementDirective>,
    pub registry: DecorationRegistry,
}

impl WorldBuild {
    pub fn terrain_count(&self) -> usize {
        self.directives.iter().filter(|d| d.is_terrain()).count()
    }

    pub fn water_count(&self) -> usize {
        self.directives.iter().filter(|d| d.is_water()).count()
    }

    pub fn decoration_count(&self) -> usize {
        self.directives.iter().filter(|d| d.is_decoration()).count()
    }
}

/// Turns a [`TerrainConfig`] into a height map and placement directives.
#[derive(Debug, Clone)]
pub struct TerrainBuilder {
    config: TerrainConfig,
}

impl TerrainBuilder {
    /// Validate `config` up front so `build` never starts on bad input.
    pub fn new(config: TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn build(&self) -> Result<WorldBuild, TerrainError> {
        let _span = tracing::info_span!("terrain_build", size = self.config.world_size).entered();
        let config = &self.config;
        let field = NoiseField::new(config.octaves, config.base_frequency, config.seed)?;
        let heightmap = HeightMap::generate(&field, config);
        let seed = config.seed.unwrap_or(0);

        let mut sink = DirectiveSink::new(seed);
        let mut registry = DecorationRegistry::new();

        for (x, z, level) in heightmap.cells() {
            self.emit_column(&mut sink, x, z, level);
        }

        for (x, z, level) in heightmap.cells() {
            if level <= config.water_level {
                continue;
            }
            let mut rng = column_rng(seed, x, z);
            if !rng.random_bool(config.decoration_chance) {
                continue;
            }
            let base = self.cell_origin(x, z) + Vec3::Y * self.column_top(level);
            let scale = config.layer_height;
            let (kind, root) = if rng.random_bool(0.6) {
                let root = decoration::tree(&mut sink, &config.palette, &mut rng, base, scale);
                (DecorationKind::Tree, root)
            } else {
                let root = decoration::crystal(&mut sink, &config.palette, &mut rng, base, scale);
                (DecorationKind::Crystal, root)
            };
            tracing::trace!(x, z, ?kind, "placed decoration");
            registry.insert(kind, root);
        }

        let extent = config.world_size as f32 * config.cell_size * 0.5;
        let sky = self.column_top(heightmap.max_level());
        for i in 0..config.rainbow_count {
            let angle = TAU * i as f32 / config.rainbow_count as f32;
            let position = Vec3::new(
                angle.cos() * extent * 0.5,
                sky + 5.0 + 2.0 * i as f32,
                angle.sin() * extent * 0.5,
            );
            let radius = (extent * 0.6).max(1.0);
            let root = decoration::rainbow(&mut sink, &config.palette, position, radius);
            registry.insert(DecorationKind::Rainbow, root);
        }

        let build = WorldBuild {
            heightmap,
            directives: sink.into_directives(),
            registry,
        };
        tracing::debug!(
            terrain = build.terrain_count(),
            water = build.water_count(),
            decorations = build.registry.len(),
            "terrain build complete"
        );
        Ok(build)
    }

    /// Terrain blocks from the floor up to `level`, then water up to the water level.
    fn emit_column(&self, sink: &mut DirectiveSink, x: usize, z: usize, level: i32) {
        let config = &self.config;
        let palette = &config.palette;
        let origin = self.cell_origin(x, z);
        let block = Primitive::Box {
            width: config.cell_size,
            height: config.layer_height,
            depth: config.cell_size,
        };

        for y in 0..=level {
            let (layer, material) = if y == level {
                (TerrainLayer::Surface, &palette.surface)
            } else if level - y <= config.subsurface_depth {
                (TerrainLayer::Subsurface, &palette.subsurface)
            } else {
                (TerrainLayer::Core, &palette.core)
            };
            sink.push(
                Placement::at(
                    DirectiveKind::Terrain { layer },
                    origin + Vec3::Y * (y as f32 * config.layer_height),
                    block,
                    material,
                )
                .in_cell(IVec3::new(x as i32, y, z as i32)),
            );
        }

        for y in level.saturating_add(1)..=config.water_level {
            sink.push(
                Placement::at(
                    DirectiveKind::Water,
                    origin + Vec3::Y * (y as f32 * config.layer_height),
                    block,
                    &palette.water,
                )
                .in_cell(IVec3::new(x as i32, y, z as i32)),
            );
        }
    }

    /// World position of the centre of cell `(x, z)` at Y = 0; the grid is centred on the origin.
    fn cell_origin(&self, x: usize, z: usize) -> Vec3 {
        let half = self.config.world_size as f32 / 2.0;
        Vec3::new(
            (x as f32 - half) * self.config.cell_size,
            0.0,
            (z as f32 - half) * self.config.cell_size,
        )
    }

    /// Y of the top face of a column whose surface block sits at `level`.
    fn column_top(&self, level: i32) -> f32 {
        (level as f32 + 0.5) * self.config.layer_height
    }
}

fn column_rng(seed: u64, x: usize, z: usize) -> Xoshiro256PlusPlus {
    let cell = ((x as u64) << 32) | z as u64;
    Xoshiro256PlusPlus::seed_from_u64(splitmix64(seed ^ cell))
}
