use crate::builder::TerrainConfig;
use crate::noise::NoiseField;

/// Square grid of column heights, built once per world and immutable afterwards.
///
/// Each cell holds an integer level (0 is the floor layer; world Y is
/// `level * layer_height`) plus the continuous noise height it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    size: usize,
    layer_height: f32,
    levels: Vec<i32>,
    surface: Vec<f32>,
}

impl HeightMap {
    /// Sample `field` at every cell and discretize the result.
    ///
    /// With `quantize` set, heights round to the nearest layer and then go
    /// through a scan-order smoothing pass: each cell is capped at one step
    /// above the already processed cell on its previous row and previous
    /// column. Without it, heights are floored to the layer below and left
    /// unsmoothed.
    pub(crate) fn generate(field: &NoiseField, config: &TerrainConfig) -> Self {
        let size = config.world_size;
        let mut levels = vec![0; size * size];
        let mut surface = vec![0.0; size * size];

        for x in 0..size {
            for z in 0..size {
                let idx = x * size + z;
                let noise = field.sample(x as f64, z as f64) as f32;
                let height = config.base_height + noise * config.amplitude;
                surface[idx] = height;

                let steps = height / config.layer_height;
                let mut level = if config.quantize {
                    steps.round() as i32
                } else {
                    steps.floor() as i32
                }
                .max(0);

                if config.quantize {
                    let prev_x = (x > 0).then(|| levels[(x - 1) * size + z]);
                    let prev_z = (z > 0).then(|| levels[idx - 1]);
                    if let Some(cap) = prev_x.into_iter().chain(prev_z).map(|n| n + 1).min() {
                        level = level.min(cap);
                    }
                }
                levels[idx] = level;
            }
        }

        Self {
            size,
            layer_height: config.layer_height,
            levels,
            surface,
        }
    }

    /// Number of cells along each side.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn layer_height(&self) -> f32 {
        self.layer_height
    }

    /// Column level at `(x, z)`, or `None` outside the grid.
    pub fn level(&self, x: usize, z: usize) -> Option<i32> {
        self.index(x, z).map(|i| self.levels[i])
    }

    /// World-space top of the column at `(x, z)`.
    pub fn height(&self, x: usize, z: usize) -> Option<f32> {
        self.level(x, z).map(|l| l as f32 * self.layer_height)
    }

    /// Continuous noise height at `(x, z)` before discretization.
    pub fn surface(&self, x: usize, z: usize) -> Option<f32> {
        self.index(x, z).map(|i| self.surface[i])
    }

    pub fn min_level(&self) -> i32 {
        self.levels.iter().copied().min().unwrap_or(0)
    }

    pub fn max_level(&self) -> i32 {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// All cells in scan order as `(x, z, level)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, &level)| (i / self.size, i % self.size, level))
    }

    fn index(&self, x: usize, z: usize) -> Option<usize> {
        (x < self.size && z < self.size).then(|| x * self.size + z)
    }
}
