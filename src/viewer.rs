//! Interactive terrain viewer.
//!
//! Composites the cached biome raster with props and water ripples.
//! R regenerates, W/S and E/D nudge the thresholds, P saves a screenshot,
//! Escape exits.

use std::time::Instant;

use minifb::{Key, Window, WindowOptions};

use crate::export;
use crate::props::{self, Prop};
use crate::ripples::RippleField;
use crate::terrain::TerrainGrid;

/// Threshold step per keypress.
const THRESHOLD_STEP: f32 = 0.05;
/// Half edge of the square drawn for each prop, pixels.
const PROP_HALF: i32 = 3;

/// Run the viewer until the window closes or Escape is pressed.
pub fn run_viewer(terrain: &mut TerrainGrid, prop_count: usize) -> Result<(), minifb::Error> {
    let width = terrain.pixel_width();
    let height = terrain.pixel_height();

    let mut window = Window::new(
        "Marsh Generator - R: Regenerate, W/S E/D: Thresholds, P: Screenshot, Esc: Exit",
        width,
        height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    let mut prop_seed = terrain.params().seed as u64 ^ 0x9E37;
    let mut placed = props::place_props(terrain, prop_count, prop_seed);
    let mut ripples = RippleField::new(terrain.params().seed as u64 ^ 0x79B9);
    let mut frame = vec![0u32; width * height];
    let mut last_tick = Instant::now();

    println!("Viewer started. Controls:");
    println!("  R: Regenerate terrain");
    println!("  W/S: Water threshold up/down");
    println!("  E/D: Grass threshold up/down");
    println!("  P: Save screenshot");
    println!("  Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::R, minifb::KeyRepeat::No) {
            terrain.regenerate_random();
            prop_seed = terrain.params().seed as u64 ^ 0x9E37;
            placed = props::place_props(terrain, prop_count, prop_seed);
        }

        if window.is_key_pressed(Key::W, minifb::KeyRepeat::No) {
            terrain.set_water_threshold(terrain.water_threshold() + THRESHOLD_STEP);
            println!("Water threshold: {:.3}", terrain.water_threshold());
        }
        if window.is_key_pressed(Key::S, minifb::KeyRepeat::No) {
            terrain.set_water_threshold(terrain.water_threshold() - THRESHOLD_STEP);
            println!("Water threshold: {:.3}", terrain.water_threshold());
        }
        if window.is_key_pressed(Key::E, minifb::KeyRepeat::No) {
            terrain.set_grass_threshold(terrain.grass_threshold() + THRESHOLD_STEP);
            println!("Grass threshold: {:.3}", terrain.grass_threshold());
        }
        if window.is_key_pressed(Key::D, minifb::KeyRepeat::No) {
            terrain.set_grass_threshold(terrain.grass_threshold() - THRESHOLD_STEP);
            println!("Grass threshold: {:.3}", terrain.grass_threshold());
        }

        if window.is_key_pressed(Key::P, minifb::KeyRepeat::No) {
            let path = format!("marsh_{}.png", terrain.params().seed);
            match export::export_biome_map(terrain, &path) {
                Ok(()) => println!("Saved screenshot: {}", path),
                Err(e) => eprintln!("Failed to save screenshot: {}", e),
            }
        }

        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();
        ripples.update(dt, terrain);

        frame.copy_from_slice(terrain.render());
        draw_props(&mut frame, width, height, &placed);
        draw_ripples(&mut frame, width, height, &ripples);

        window.update_with_buffer(&frame, width, height)?;
    }

    Ok(())
}

fn draw_props(frame: &mut [u32], width: usize, height: usize, placed: &[Prop]) {
    for prop in placed {
        let [r, g, b] = prop.kind.color();
        let pixel = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        let cx = prop.x as i32;
        let cy = prop.y as i32;

        for dy in -PROP_HALF..=PROP_HALF {
            for dx in -PROP_HALF..=PROP_HALF {
                put_pixel(frame, width, height, cx + dx, cy + dy, pixel);
            }
        }
    }
}

fn draw_ripples(frame: &mut [u32], width: usize, height: usize, ripples: &RippleField) {
    for ring in ripples.rings() {
        let radius = (ring.scale * if ring.small { 8.0 } else { 14.0 }) as i32;
        if radius <= 0 {
            continue;
        }

        let shade = (ring.alpha * 255.0) as u32;
        let pixel = shade << 16 | shade << 8 | (shade + 40).min(0xFF);
        let cx = ring.x as i32;
        let cy = ring.y as i32;

        // Midpoint circle outline.
        let mut x = radius;
        let mut y = 0i32;
        let mut err = 1 - radius;
        while x >= y {
            for &(px, py) in &[
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                put_pixel(frame, width, height, px, py, pixel);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }
}

fn put_pixel(frame: &mut [u32], width: usize, height: usize, x: i32, y: i32, pixel: u32) {
    if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
        frame[y as usize * width + x as usize] = pixel;
    }
}
