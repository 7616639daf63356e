//! Cache coverage CLI command.
//!
//! Projects the stored tiles of one layer into a GeoJSON
//! FeatureCollection on stdout, ready to drop onto any map viewer.

use clap::Args;

use tilevault::crs::WebMercator;
use tilevault::geojson::stored_tiles_to_geojson;
use tilevault::store::TileStore;

use crate::error::CliError;

/// Arguments for `tilevault coverage`.
#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// URL template whose cached tiles to project
    pub template: String,

    /// Tile edge length in pixels
    #[arg(long, default_value_t = 256)]
    pub tile_size: u32,

    /// Rows were recorded under TMS numbering; re-invert before projecting
    #[arg(long)]
    pub tms: bool,
}

/// Run the coverage command.
pub async fn run(store: &TileStore, args: CoverageArgs) -> Result<(), CliError> {
    let tiles = store.list_by_template(&args.template).await?;
    let fc = stored_tiles_to_geojson(&tiles, args.tile_size, args.tms, &WebMercator);
    println!("{}", serde_json::to_string_pretty(&fc)?);
    Ok(())
}
