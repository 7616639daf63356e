//! Tile resolution CLI command.
//!
//! Pure wrapper over the library's grid resolver: prints the descriptors
//! covering a pixel rectangle, one JSON object per line, without
//! touching the store or the network.

use clap::Args;

use tilevault::coord::PixelBounds;
use tilevault::crs::WebMercator;
use tilevault::grid::compute_tiles;
use tilevault::source::{TileSource, WrappingSum};

use crate::error::CliError;

/// Arguments for `tilevault resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Tile URL template, e.g. "https://{s}.tile.example.org/{z}/{x}/{y}.png"
    pub template: String,

    /// Viewport rectangle in world pixels: min-x min-y max-x max-y
    #[arg(num_args = 4, value_names = ["MIN_X", "MIN_Y", "MAX_X", "MAX_Y"])]
    pub bounds: Vec<f64>,

    /// Zoom level to resolve tile URLs at
    #[arg(short, long)]
    pub zoom: u8,

    /// Comma-separated subdomain labels for the {s} placeholder
    #[arg(long, value_delimiter = ',')]
    pub subdomains: Vec<String>,

    /// Tile edge length in pixels
    #[arg(long, default_value_t = 256)]
    pub tile_size: u32,

    /// Treat the source as TMS (row 0 at the south edge)
    #[arg(long)]
    pub tms: bool,
}

/// Run the resolve command.
pub fn run(args: ResolveArgs) -> Result<(), CliError> {
    let [min_x, min_y, max_x, max_y]: [f64; 4] = args
        .bounds
        .as_slice()
        .try_into()
        .map_err(|_| CliError::Config("expected four bound values".to_string()))?;
    if min_x > max_x || min_y > max_y {
        return Err(CliError::Config(
            "bounds must satisfy min <= max per axis".to_string(),
        ));
    }

    let source = TileSource::new(&args.template)
        .with_subdomains(args.subdomains)
        .with_tile_size(args.tile_size)
        .with_tms(args.tms);
    let bounds = PixelBounds::from_coords(min_x, min_y, max_x, max_y);

    let tiles = compute_tiles(&source, &bounds, args.zoom, &WebMercator, &WrappingSum)?;
    for tile in &tiles {
        println!("{}", serde_json::to_string(tile)?);
    }
    Ok(())
}
