use clap::Parser;

use marsh_generator::export;
use marsh_generator::terrain::{GenParams, TerrainGrid};
use marsh_generator::viewer;

#[derive(Parser, Debug)]
#[command(name = "marsh_generator")]
#[command(about = "Generate procedural marsh terrain maps with biome thresholds")]
struct Args {
    /// Width of the grid in cells
    #[arg(short = 'W', long, default_value = "40")]
    width: usize,

    /// Height of the grid in cells
    #[arg(short = 'H', long, default_value = "30")]
    height: usize,

    /// Pixel edge length of one cell
    #[arg(short, long, default_value = "20")]
    cell_size: usize,

    /// Random seed (uses an entropy draw with random rotation/offset if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Number of noise octaves
    #[arg(long, default_value = "6")]
    octaves: u32,

    /// Amplitude decay per octave (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    persistence: f32,

    /// Water/swamp threshold
    #[arg(long)]
    water_threshold: Option<f32>,

    /// Swamp/grass threshold
    #[arg(long)]
    grass_threshold: Option<f32>,

    /// Number of decorative props to scatter in the viewer
    #[arg(long, default_value = "100")]
    props: usize,

    /// Export the biome map to a PNG (e.g. "marsh.png")
    #[arg(long)]
    export: Option<String>,

    /// Export the raw value field to a PNG
    #[arg(long)]
    export_values: Option<String>,

    /// Export the biome map as ASCII text
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export a JSON snapshot (params, thresholds, cell values)
    #[arg(long)]
    export_snapshot: Option<String>,

    /// Generate and export without opening the viewer window
    #[arg(long)]
    headless: bool,
}

fn main() {
    let args = Args::parse();

    let params = match args.seed {
        Some(seed) => GenParams {
            octaves: args.octaves,
            persistence: args.persistence,
            ..GenParams::from_seed(seed)
        },
        None => GenParams {
            octaves: args.octaves,
            persistence: args.persistence,
            ..GenParams::random()
        },
    };

    println!("Generating terrain with seed: {}", params.seed);
    println!(
        "Grid: {}x{} cells, {}px each",
        args.width, args.height, args.cell_size
    );

    let mut terrain = TerrainGrid::with_params(args.width, args.height, args.cell_size, params);

    if let Some(threshold) = args.water_threshold {
        terrain.set_water_threshold(threshold);
    }
    if let Some(threshold) = args.grass_threshold {
        terrain.set_grass_threshold(threshold);
    }
    println!(
        "Thresholds: water {:.3}, grass {:.3}",
        terrain.water_threshold(),
        terrain.grass_threshold()
    );

    if let Some(ref path) = args.export {
        match export::export_biome_map(&mut terrain, path) {
            Ok(()) => println!("Exported biome map to: {}", path),
            Err(e) => eprintln!("Failed to export biome map: {}", e),
        }
    }

    if let Some(ref path) = args.export_values {
        match export::export_value_map(&terrain, path) {
            Ok(()) => println!("Exported value map to: {}", path),
            Err(e) => eprintln!("Failed to export value map: {}", e),
        }
    }

    if let Some(ref path) = args.export_ascii {
        match export::export_ascii_map(&terrain, path) {
            Ok(()) => println!("Exported ASCII map to: {}", path),
            Err(e) => eprintln!("Failed to export ASCII map: {}", e),
        }
    }

    if let Some(ref path) = args.export_snapshot {
        match export::export_snapshot(&terrain, path) {
            Ok(()) => println!("Exported snapshot to: {}", path),
            Err(e) => eprintln!("Failed to export snapshot: {}", e),
        }
    }

    if args.headless {
        return;
    }

    if let Err(e) = viewer::run_viewer(&mut terrain, args.props) {
        eprintln!("Viewer error: {}", e);
    }
}
