//! Marsh terrain generation library
//!
//! Re-exports modules for use by the CLI binary and tools.

pub mod biomes;
pub mod export;
pub mod grid;
pub mod noise_field;
pub mod props;
pub mod ripples;
pub mod terrain;
pub mod viewer;
