//! GeoJSON projection of stored tiles
//!
//! Reverse-maps stored tile records into geographic polygons so cache
//! coverage can be drawn on a map or inspected by eye. Purely a
//! read-side transform: nothing here touches the store.

use serde::{Deserialize, Serialize};

use crate::coord::Point;
use crate::crs::Crs;
use crate::grid::world_max_y;
use crate::store::StoredTile;

/// A GeoJSON feature collection of tile footprint polygons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// One tile footprint. Properties carry the full stored tile metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: StoredTile,
    pub geometry: Geometry,
}

/// Polygon geometry: one outer ring of `[lng, lat]` positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

/// Projects stored tiles into a GeoJSON FeatureCollection of footprint
/// polygons.
///
/// `tms` states the convention the records' `y` indices are in: pass
/// `true` for tiles recorded under bottom-left-origin numbering, and the
/// row is re-inverted to rendering convention before projection, using
/// the world row count at that tile's own zoom (tiles in the sequence
/// may carry different zoom levels).
///
/// Each polygon is a closed five-point ring running top-left, top-right,
/// bottom-right, bottom-left and back to top-left, consistently across
/// all features.
pub fn stored_tiles_to_geojson(
    tiles: &[StoredTile],
    tile_size: u32,
    tms: bool,
    crs: &dyn Crs,
) -> FeatureCollection {
    let features = tiles
        .iter()
        .map(|tile| {
            let y = if tms {
                world_max_y(crs, tile.z, tile_size) - tile.y
            } else {
                tile.y
            };

            let size = f64::from(tile_size);
            let top_left = Point::new(tile.x as f64 * size, y as f64 * size);
            let bottom_right = Point::new(top_left.x + size, top_left.y + size);

            let nw = crs.pixel_to_geo(top_left, tile.z);
            let se = crs.pixel_to_geo(bottom_right, tile.z);

            let ring = vec![
                [nw.lng, nw.lat],
                [se.lng, nw.lat],
                [se.lng, se.lat],
                [nw.lng, se.lat],
                [nw.lng, nw.lat],
            ];

            Feature {
                kind: "Feature".to_string(),
                properties: tile.clone(),
                geometry: Geometry {
                    kind: "Polygon".to_string(),
                    coordinates: vec![ring],
                },
            }
        })
        .collect();

    FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features,
    }
}
