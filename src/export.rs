//! Export tools for terrain maps.
//!
//! PNG renders of the biome raster and the raw value field, an ASCII text
//! dump for quick terminal inspection, and a JSON snapshot carrying the
//! exact parameters needed to recreate a map. All of it is diagnostic
//! output; the game itself never persists terrain.

use std::fs::File;
use std::io::{self, Write};

use chrono::Local;
use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::terrain::{GenParams, TerrainGrid};

/// Save the rasterized biome map as a PNG. Rebuilds the cache first if it
/// is stale, which is why the grid is taken mutably.
pub fn export_biome_map(terrain: &mut TerrainGrid, path: &str) -> Result<(), image::ImageError> {
    let width = terrain.pixel_width() as u32;
    let height = terrain.pixel_height() as u32;
    let pixels = terrain.render();

    let mut img: RgbImage = ImageBuffer::new(width, height);
    for (i, &pixel) in pixels.iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        img.put_pixel(x, y, Rgb(unpack(pixel)));
    }

    img.save(path)
}

/// Save the raw noise values as a PNG, one pixel per cell, through a
/// cold-to-warm colormap. Useful for judging the field before thresholds.
pub fn export_value_map(terrain: &TerrainGrid, path: &str) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(terrain.width() as u32, terrain.height() as u32);

    for y in 0..terrain.height() {
        for x in 0..terrain.width() {
            let value = terrain
                .value_at(x, y)
                .expect("iterating the grid's own dimensions");
            img.put_pixel(x as u32, y as u32, Rgb(value_colormap(value)));
        }
    }

    img.save(path)
}

/// Cold-to-warm gradient over `[0, 1]`: deep blue through teal and green
/// to yellow.
fn value_colormap(t: f32) -> [u8; 3] {
    let stops: [[f32; 3]; 5] = [
        [0.05, 0.15, 0.45],
        [0.10, 0.45, 0.60],
        [0.25, 0.65, 0.45],
        [0.55, 0.80, 0.35],
        [0.95, 0.90, 0.45],
    ];

    let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
    let idx = (scaled as usize).min(stops.len() - 2);
    let frac = scaled - idx as f32;

    let a = stops[idx];
    let b = stops[idx + 1];
    [
        ((a[0] + (b[0] - a[0]) * frac) * 255.0) as u8,
        ((a[1] + (b[1] - a[1]) * frac) * 255.0) as u8,
        ((a[2] + (b[2] - a[2]) * frac) * 255.0) as u8,
    ]
}

/// Write the biome map as ASCII text, one character per cell.
pub fn export_ascii_map(terrain: &TerrainGrid, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "Biome map {}x{}", terrain.width(), terrain.height())?;
    writeln!(
        file,
        "Generated: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(
        file,
        "Thresholds: water {:.3}, grass {:.3}",
        terrain.water_threshold(),
        terrain.grass_threshold()
    )?;
    writeln!(file)?;

    for y in 0..terrain.height() {
        let mut line = String::with_capacity(terrain.width());
        for x in 0..terrain.width() {
            let biome = terrain
                .biome_at(x, y)
                .expect("iterating the grid's own dimensions");
            line.push(biome.ascii_char());
        }
        writeln!(file, "{}", line)?;
    }

    Ok(())
}

/// Full snapshot of a map's inputs and values. Feeding `params` back into
/// `TerrainGrid::regenerate` recreates the same field.
#[derive(Debug, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub cell_size: usize,
    pub params: GenParams,
    pub water_threshold: f32,
    pub grass_threshold: f32,
    /// Row-major cell values.
    pub values: Vec<f32>,
}

impl GridSnapshot {
    pub fn capture(terrain: &TerrainGrid) -> Self {
        let mut values = Vec::with_capacity(terrain.width() * terrain.height());
        for y in 0..terrain.height() {
            for x in 0..terrain.width() {
                values.push(
                    terrain
                        .value_at(x, y)
                        .expect("iterating the grid's own dimensions"),
                );
            }
        }

        Self {
            width: terrain.width(),
            height: terrain.height(),
            cell_size: terrain.cell_size(),
            params: terrain.params(),
            water_threshold: terrain.water_threshold(),
            grass_threshold: terrain.grass_threshold(),
            values,
        }
    }
}

/// Write a JSON snapshot of the map.
pub fn export_snapshot(terrain: &TerrainGrid, path: &str) -> io::Result<()> {
    let snapshot = GridSnapshot::capture(terrain);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot).map_err(io::Error::from)
}

fn unpack(pixel: u32) -> [u8; 3] {
    [
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::GenParams;

    #[test]
    fn test_colormap_endpoints_and_ordering() {
        assert_eq!(value_colormap(0.0), value_colormap(-1.0));
        assert_eq!(value_colormap(1.0), value_colormap(2.0));

        // Low values are blue-dominant, high values are not.
        let low = value_colormap(0.0);
        let high = value_colormap(1.0);
        assert!(low[2] > low[0]);
        assert!(high[0] > high[2]);
    }

    #[test]
    fn test_unpack_round_trips_packed_pixels() {
        assert_eq!(unpack(0x088F8F), [8, 143, 143]);
        assert_eq!(unpack(0x6FD290), [111, 210, 144]);
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let terrain = TerrainGrid::with_params(6, 4, 3, GenParams::from_seed(31));
        let snapshot = GridSnapshot::capture(&terrain);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: GridSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.width, 6);
        assert_eq!(restored.height, 4);
        assert_eq!(restored.cell_size, 3);
        assert_eq!(restored.params, snapshot.params);
        assert_eq!(restored.values, snapshot.values);
    }

    #[test]
    fn test_snapshot_values_match_the_grid() {
        let terrain = TerrainGrid::with_params(5, 5, 2, GenParams::from_seed(8));
        let snapshot = GridSnapshot::capture(&terrain);

        assert_eq!(snapshot.values.len(), 25);
        assert_eq!(snapshot.values[7], terrain.value_at(2, 1).unwrap());
    }
}
