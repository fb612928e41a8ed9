//! Seeded terrain grid with a lazily rebuilt raster cache.
//!
//! `TerrainGrid` owns the per-cell noise values, the permutation-table
//! noise field that produced them, the classification thresholds and the
//! rasterized pixel cache. Collaborators hold a reference and read cell
//! geometry and biome classification; only the owner mutates.

use std::f32::consts::TAU;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biomes::{Biome, BiomePalette};
use crate::grid::Grid;
use crate::noise_field::NoiseField;

/// Spatial frequency applied to rotated cell coordinates.
const DEFAULT_SCALE: f32 = 0.05;
const DEFAULT_OCTAVES: u32 = 6;
const DEFAULT_PERSISTENCE: f32 = 0.5;

/// Offsets drawn by `GenParams::random` stay within this symmetric range.
const OFFSET_RANGE: f32 = 1000.0;

const DEFAULT_WATER_THRESHOLD: f32 = 0.425;
const DEFAULT_GRASS_THRESHOLD: f32 = 0.55;

/// Everything that determines a generated field. Two grids regenerated
/// from equal params hold identical cell values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenParams {
    pub seed: u32,
    /// Rotation applied to cell coordinates before sampling, radians.
    pub rotation: f32,
    /// Translation applied after rotation, in cell units.
    pub offset: (f32, f32),
    pub octaves: u32,
    pub persistence: f32,
    pub scale: f32,
}

impl GenParams {
    /// Deterministic params: pinned rotation 0 and offset (0, 0).
    pub fn from_seed(seed: u32) -> Self {
        Self {
            seed,
            rotation: 0.0,
            offset: (0.0, 0.0),
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            scale: DEFAULT_SCALE,
        }
    }

    /// Draw seed, rotation and offset from OS entropy. Every call yields an
    /// unrelated map; pin the fields (or use `from_seed`) for reproducible
    /// output.
    pub fn random() -> Self {
        let mut entropy = rand::thread_rng();
        Self {
            seed: entropy.gen(),
            rotation: entropy.gen_range(0.0..TAU),
            offset: (
                entropy.gen_range(-OFFSET_RANGE..=OFFSET_RANGE),
                entropy.gen_range(-OFFSET_RANGE..=OFFSET_RANGE),
            ),
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            scale: DEFAULT_SCALE,
        }
    }
}

impl Default for GenParams {
    fn default() -> Self {
        Self::from_seed(0)
    }
}

/// Terrain query errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainError {
    /// A query addressed a cell outside the grid.
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "cell ({}, {}) is outside the {}x{} grid",
                    x, y, width, height
                )
            }
        }
    }
}

impl std::error::Error for TerrainError {}

/// Snapshot of the raster cache's bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Number of full rasterization passes performed so far.
    pub rebuilds: u64,
    /// Whether the cached pixels are stale relative to grid and thresholds.
    pub dirty: bool,
}

/// Rasterized biome map. The buffer is allocated once per grid lifetime
/// and rewritten in place on rebuild.
struct RasterCache {
    pixels: Vec<u32>,
    dirty: bool,
    rebuilds: u64,
}

/// A seeded biome map over a bounded play area.
pub struct TerrainGrid {
    width: usize,
    height: usize,
    cell_size: usize,
    water_threshold: f32,
    grass_threshold: f32,
    palette: BiomePalette,
    params: GenParams,
    noise: NoiseField,
    values: Grid<f32>,
    cache: RasterCache,
}

impl TerrainGrid {
    /// Create a grid and generate an initial field from OS entropy.
    pub fn new(width: usize, height: usize, cell_size: usize) -> Self {
        Self::with_params(width, height, cell_size, GenParams::random())
    }

    /// Create a grid and generate from explicit params. This is the
    /// deterministic entry point.
    pub fn with_params(width: usize, height: usize, cell_size: usize, params: GenParams) -> Self {
        let cell_size = cell_size.max(1);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);

        let mut terrain = Self {
            width,
            height,
            cell_size,
            water_threshold: DEFAULT_WATER_THRESHOLD,
            grass_threshold: DEFAULT_GRASS_THRESHOLD,
            palette: BiomePalette::default(),
            params,
            noise: NoiseField::from_rng(&mut rng),
            values: Grid::new_with(width, height, 0.0),
            cache: RasterCache {
                pixels: vec![0; width * cell_size * height * cell_size],
                dirty: true,
                rebuilds: 0,
            },
        };
        terrain.regenerate(params);
        terrain
    }

    /// Build a grid directly from row-major cell values, bypassing noise.
    /// Test seam for pinning exact cell contents.
    #[allow(dead_code)]
    pub(crate) fn from_values(
        width: usize,
        height: usize,
        cell_size: usize,
        values: Vec<f32>,
    ) -> Self {
        let cell_size = cell_size.max(1);
        let params = GenParams::from_seed(0);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);
        let values = Grid::from_vec(width, height, values).expect("value count mismatch");

        Self {
            width,
            height,
            cell_size,
            water_threshold: DEFAULT_WATER_THRESHOLD,
            grass_threshold: DEFAULT_GRASS_THRESHOLD,
            palette: BiomePalette::default(),
            params,
            noise: NoiseField::from_rng(&mut rng),
            values,
            cache: RasterCache {
                pixels: vec![0; width * cell_size * height * cell_size],
                dirty: true,
                rebuilds: 0,
            },
        }
    }

    /// Resample every cell from a freshly seeded noise field.
    ///
    /// Reseeds the generator, rebuilds the permutation table, then rotates
    /// and translates each cell coordinate, scales by `params.scale` and
    /// samples the fractal noise. Raw values are normalized from `[-1, 1]`
    /// into `[0, 1]`. The raster cache is invalidated unconditionally.
    pub fn regenerate(&mut self, params: GenParams) {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);
        self.noise = NoiseField::from_rng(&mut rng);
        self.params = params;

        let (sin_a, cos_a) = params.rotation.sin_cos();
        let (offset_x, offset_y) = params.offset;

        for y in 0..self.height {
            for x in 0..self.width {
                let fx = x as f32;
                let fy = y as f32;
                let sample_x = (fx * cos_a - fy * sin_a + offset_x) * params.scale;
                let sample_y = (fx * sin_a + fy * cos_a + offset_y) * params.scale;

                let raw = self
                    .noise
                    .fbm(sample_x, sample_y, params.octaves, params.persistence);
                let value = ((raw + 1.0) * 0.5).clamp(0.0, 1.0);
                self.values.set(x, y, value);
            }
        }

        self.cache.dirty = true;
    }

    /// Regenerate from a fresh entropy draw. Prints the drawn seed so an
    /// interesting map can be reported, even though the rotation and offset
    /// needed to reproduce it are only available via `params()`.
    pub fn regenerate_random(&mut self) {
        let params = GenParams::random();
        println!("Regenerating terrain with seed: {}", params.seed);
        self.regenerate(params);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel edge length of one cell; constant for the grid's lifetime.
    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn pixel_width(&self) -> usize {
        self.width * self.cell_size
    }

    pub fn pixel_height(&self) -> usize {
        self.height * self.cell_size
    }

    /// Params of the most recent generation; feeding these back into
    /// `regenerate` reproduces the current field exactly.
    pub fn params(&self) -> GenParams {
        self.params
    }

    pub fn water_threshold(&self) -> f32 {
        self.water_threshold
    }

    pub fn grass_threshold(&self) -> f32 {
        self.grass_threshold
    }

    /// Move the water/swamp split. Clamped into `[0, 1]`; marks the cache
    /// dirty without resampling any noise.
    pub fn set_water_threshold(&mut self, threshold: f32) {
        self.water_threshold = threshold.clamp(0.0, 1.0);
        self.cache.dirty = true;
    }

    /// Move the swamp/grass split. Clamped into `[0, 1]`; marks the cache
    /// dirty without resampling any noise.
    pub fn set_grass_threshold(&mut self, threshold: f32) {
        self.grass_threshold = threshold.clamp(0.0, 1.0);
        self.cache.dirty = true;
    }

    pub fn palette(&self) -> BiomePalette {
        self.palette
    }

    pub fn set_palette(&mut self, palette: BiomePalette) {
        self.palette = palette;
        self.cache.dirty = true;
    }

    /// Raw noise value of a cell, in `[0, 1]`.
    pub fn value_at(&self, x: usize, y: usize) -> Result<f32, TerrainError> {
        self.values
            .get(x, y)
            .copied()
            .ok_or(TerrainError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Biome of a cell under the current thresholds.
    pub fn biome_at(&self, x: usize, y: usize) -> Result<Biome, TerrainError> {
        Ok(Biome::classify(
            self.value_at(x, y)?,
            self.water_threshold,
            self.grass_threshold,
        ))
    }

    /// Whether a cell is water. O(1) lookup; safe to call every frame for
    /// every entity without touching the raster cache.
    pub fn is_water(&self, x: usize, y: usize) -> Result<bool, TerrainError> {
        Ok(self.biome_at(x, y)? == Biome::Water)
    }

    /// Rasterized biome map, `0RGB` row-major at
    /// `pixel_width() x pixel_height()`.
    ///
    /// Rebuilds the cache if a mutation happened since the last call;
    /// otherwise returns the cached buffer untouched.
    pub fn render(&mut self) -> &[u32] {
        if self.cache.dirty {
            self.rebuild_cache();
            self.cache.dirty = false;
            self.cache.rebuilds += 1;
        }
        &self.cache.pixels
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            rebuilds: self.cache.rebuilds,
            dirty: self.cache.dirty,
        }
    }

    /// One classification + palette pass over every cell, expanded into
    /// `cell_size`-square pixel blocks.
    fn rebuild_cache(&mut self) {
        let pixel_width = self.width * self.cell_size;

        for (x, y, &value) in self.values.iter() {
            let biome = Biome::classify(value, self.water_threshold, self.grass_threshold);
            let [r, g, b] = self.palette.color(biome);
            let pixel = (r as u32) << 16 | (g as u32) << 8 | b as u32;

            let base_x = x * self.cell_size;
            let base_y = y * self.cell_size;
            for dy in 0..self.cell_size {
                let row_start = (base_y + dy) * pixel_width + base_x;
                self.cache.pixels[row_start..row_start + self.cell_size].fill(pixel);
            }
        }
    }
}
