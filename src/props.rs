//! Decoration placement over generated terrain.
//!
//! Scatters props at random pixel positions and picks each prop's kind
//! from the biome of the cell underneath it: lily pads float on water,
//! cattails grow in swamp, stones sit on grass.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::terrain::TerrainGrid;

/// Sprite variants shipped per prop kind.
pub const VARIANTS_PER_KIND: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    LilyPad,
    Cattail,
    Stone,
}

impl PropKind {
    /// The prop that decorates a given biome band.
    pub fn for_biome(biome: Biome) -> PropKind {
        match biome {
            Biome::Water => PropKind::LilyPad,
            Biome::Swamp => PropKind::Cattail,
            Biome::Grass => PropKind::Stone,
        }
    }

    /// Accent color for untextured rendering.
    pub fn color(&self) -> [u8; 3] {
        match self {
            PropKind::LilyPad => [46, 110, 74],
            PropKind::Cattail => [122, 96, 44],
            PropKind::Stone => [128, 128, 124],
        }
    }
}

/// A placed decoration, in pixel space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Prop {
    pub kind: PropKind,
    pub x: f32,
    pub y: f32,
    /// Which of the sprite variants to draw.
    pub variant: u8,
}

/// Scatter `count` props across the play area. Positions are uniform in
/// pixel space; each prop's kind follows the biome under it. Deterministic
/// for a given seed and terrain.
pub fn place_props(terrain: &TerrainGrid, count: usize, seed: u64) -> Vec<Prop> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut props = Vec::with_capacity(count);

    let pixel_width = terrain.pixel_width() as f32;
    let pixel_height = terrain.pixel_height() as f32;
    let cell_size = terrain.cell_size() as f32;
    if pixel_width == 0.0 || pixel_height == 0.0 {
        return props;
    }

    for _ in 0..count {
        let x = rng.gen_range(0.0..pixel_width);
        let y = rng.gen_range(0.0..pixel_height);

        let grid_x = (x / cell_size) as usize;
        let grid_y = (y / cell_size) as usize;
        let Ok(biome) = terrain.biome_at(grid_x, grid_y) else {
            continue;
        };

        props.push(Prop {
            kind: PropKind::for_biome(biome),
            x,
            y,
            variant: rng.gen_range(0..VARIANTS_PER_KIND),
        });
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard_terrain() -> TerrainGrid {
        // Alternating water (0.1) and grass (0.9) cells.
        let values = (0..64)
            .map(|i| if (i % 8 + i / 8) % 2 == 0 { 0.1 } else { 0.9 })
            .collect();
        TerrainGrid::from_values(8, 8, 10, values)
    }

    #[test]
    fn test_props_land_inside_the_play_area() {
        let terrain = checkerboard_terrain();
        let props = place_props(&terrain, 200, 42);

        assert_eq!(props.len(), 200);
        for prop in &props {
            assert!(prop.x >= 0.0 && prop.x < terrain.pixel_width() as f32);
            assert!(prop.y >= 0.0 && prop.y < terrain.pixel_height() as f32);
            assert!(prop.variant < VARIANTS_PER_KIND);
        }
    }

    #[test]
    fn test_prop_kind_follows_the_cell_biome() {
        let terrain = checkerboard_terrain();

        for prop in place_props(&terrain, 300, 7) {
            let grid_x = (prop.x / terrain.cell_size() as f32) as usize;
            let grid_y = (prop.y / terrain.cell_size() as f32) as usize;
            let biome = terrain.biome_at(grid_x, grid_y).unwrap();
            assert_eq!(prop.kind, PropKind::for_biome(biome));
        }
    }

    #[test]
    fn test_placement_is_deterministic_per_seed() {
        let terrain = checkerboard_terrain();

        let a = place_props(&terrain, 50, 1234);
        let b = place_props(&terrain, 50, 1234);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, pb.y);
            assert_eq!(pa.kind, pb.kind);
            assert_eq!(pa.variant, pb.variant);
        }
    }

    #[test]
    fn test_all_water_terrain_yields_only_lily_pads() {
        let terrain = TerrainGrid::from_values(4, 4, 5, vec![0.0; 16]);

        for prop in place_props(&terrain, 100, 9) {
            assert_eq!(prop.kind, PropKind::LilyPad);
        }
    }
}
