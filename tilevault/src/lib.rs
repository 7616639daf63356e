//! TileVault - Offline raster tile persistence
//!
//! This library lets a map client persist raster map tiles locally so a
//! map can render without network access, and later retrieve, enumerate,
//! and delete those tiles.
//!
//! # Components
//!
//! - [`grid`] - the tile grid resolver: given a viewport rectangle in
//!   world-pixel space, a zoom level, and a [`source::TileSource`],
//!   enumerates the exact tiles needed to cover it, with stable cache
//!   keys and resolved fetch URLs. Handles XYZ and TMS row numbering and
//!   multi-subdomain URL templates. Pure, no I/O.
//! - [`store`] - the persistent tile store: SQLite-backed, keyed by the
//!   cache key, with layer-scoped (URL template) and zoom-scoped
//!   secondary indexes, a versioned schema upgrade path, and a
//!   process-wide lazily-opened shared handle.
//! - [`geojson`] - the geo projector: reverse-maps stored tiles into
//!   GeoJSON footprint polygons for coverage visualization.
//! - [`fetch`] - the HTTP helper that produces the bytes callers hand to
//!   `save`; the store itself never touches the network.
//!
//! # Example
//!
//! ```no_run
//! use tilevault::crs::WebMercator;
//! use tilevault::coord::PixelBounds;
//! use tilevault::grid::compute_tiles;
//! use tilevault::source::{TileSource, WrappingSum};
//! use tilevault::store::TileStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = TileSource::new("https://{s}.tile.example.org/{z}/{x}/{y}.png")
//!     .with_subdomains(["a", "b", "c"]);
//! let viewport = PixelBounds::from_coords(0.0, 0.0, 512.0, 512.0);
//!
//! let tiles = compute_tiles(&source, &viewport, 1, &WebMercator, &WrappingSum)?;
//! let store = TileStore::shared("tiles.db").await?;
//! for tile in &tiles {
//!     // bytes fetched externally, e.g. via tilevault::fetch
//!     store.save(tile, vec![/* ... */]).await?;
//! }
//! assert_eq!(store.count().await?, 4);
//! # Ok(())
//! # }
//! ```

pub mod coord;
pub mod crs;
pub mod fetch;
pub mod geojson;
pub mod grid;
pub mod logging;
pub mod source;
pub mod store;

pub use coord::{LatLng, PixelBounds, Point, TileCoord};
pub use crs::{Crs, WebMercator};
pub use grid::{compute_tiles, TileDescriptor};
pub use source::{TileSource, WrappingSum};
pub use store::{StoredTile, TileStore};
