//! Tile grid resolver
//!
//! Maps a world-pixel viewport rectangle plus a zoom level and a
//! [`TileSource`] to the exact, ordered set of tiles covering it. Each
//! entry carries two URLs: the `key` (built with the first subdomain, the
//! tile's stable cache identity) and the `url` (built with the same
//! deterministic subdomain pick the rendering layer uses, so cache
//! lookups and live fetches agree byte-for-byte).
//!
//! The resolver is pure: no I/O, no shared state, identical inputs yield
//! identical output in identical order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{px_bounds_to_tile_range, PixelBounds, TileCoord};
use crate::crs::Crs;
use crate::source::{expand_template, SubdomainSelector, TileSource};

/// Errors from tile grid resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The source's tile size is zero.
    #[error("tile size must be a positive number of pixels")]
    InvalidTileSize,
}

/// One tile the resolver decided a viewport needs.
///
/// `x`/`y`/`z` are in rendering convention (y grows downward) regardless
/// of the source scheme; `inverted_y` is the row index under the opposite
/// (bottom-left origin) convention and is always populated, so consumers
/// can reinterpret the tile under either scheme without recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDescriptor {
    /// Stable cache identity: the URL built with the first subdomain (or
    /// the template's literal `{s}` text when none are configured).
    /// Unique per `(url_template, x, y, z)` irrespective of subdomain.
    pub key: String,
    /// The URL meant for fetching, built with the deterministic
    /// per-coordinate subdomain pick.
    pub url: String,
    /// The template this tile belongs to; the store's layer-scoped index.
    pub url_template: String,
    pub x: i64,
    pub y: i64,
    pub z: u8,
    /// Row index under the opposite scheme convention.
    pub inverted_y: i64,
}

impl TileDescriptor {
    /// The tile's grid coordinate in rendering convention.
    #[inline]
    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y, self.z)
    }
}

/// The world's maximum tile row index at `zoom`: total row count derived
/// from the CRS's projected pixel extent divided by the tile size, minus
/// one. This is the constant that flips a row between XYZ and TMS.
#[inline]
pub fn world_max_y(crs: &dyn Crs, zoom: u8, tile_size: u32) -> i64 {
    let world = crs.projected_bounds(zoom);
    (world.max.y / f64::from(tile_size)).floor() as i64 - 1
}

/// Enumerates the tiles covering `pixel_bounds`, row-major (y outer, x
/// inner, both ascending and inclusive).
///
/// `zoom` is the level substituted into URLs; callers may pass a level
/// different from the one `pixel_bounds` was computed at, which is how
/// over- and underzoomed tile fetch works. The CRS is consulted only for
/// the TMS row-inversion constant.
///
/// No antimeridian wraparound is applied: x indices outside the world's
/// horizontal extent are emitted as-is and are the caller's
/// responsibility to avoid.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidTileSize`] if the source's tile size
/// is zero.
pub fn compute_tiles(
    source: &TileSource,
    pixel_bounds: &PixelBounds,
    zoom: u8,
    crs: &dyn Crs,
    selector: &dyn SubdomainSelector,
) -> Result<Vec<TileDescriptor>, ResolveError> {
    if source.tile_size == 0 {
        return Err(ResolveError::InvalidTileSize);
    }

    let range = px_bounds_to_tile_range(pixel_bounds, source.tile_size);
    let max_y = world_max_y(crs, zoom, source.tile_size);

    let mut tiles = Vec::with_capacity(range.len() as usize);
    for j in range.min_y..=range.max_y {
        for i in range.min_x..=range.max_x {
            tiles.push(descriptor_for(source, i, j, zoom, max_y, selector));
        }
    }
    Ok(tiles)
}

/// Builds the descriptor for one grid coordinate.
fn descriptor_for(
    source: &TileSource,
    x: i64,
    y: i64,
    zoom: u8,
    world_max_y: i64,
    selector: &dyn SubdomainSelector,
) -> TileDescriptor {
    let inverted_y = world_max_y - y;
    // TMS sources are addressed by the flipped row; the descriptor keeps
    // rendering convention either way.
    let served_y = if source.tms { inverted_y } else { y };

    let mut data = source.options.clone();
    data.insert("x".to_string(), x.to_string());
    data.insert("y".to_string(), served_y.to_string());
    data.insert("z".to_string(), zoom.to_string());
    data.insert("-y".to_string(), inverted_y.to_string());
    data.insert("r".to_string(), source.retina_suffix.clone());

    let key = expand_template(&source.url_template, &with_subdomain(&data, source.first_subdomain()));
    let picked = selector.select(x, y, &source.subdomains);
    let url = expand_template(&source.url_template, &with_subdomain(&data, picked));

    TileDescriptor {
        key,
        url,
        url_template: source.url_template.clone(),
        x,
        y,
        z: zoom,
        inverted_y,
    }
}

fn with_subdomain(
    data: &HashMap<String, String>,
    subdomain: Option<&str>,
) -> HashMap<String, String> {
    let mut data = data.clone();
    if let Some(s) = subdomain {
        data.insert("s".to_string(), s.to_string());
    }
    data
}
