//! Coordinate types and shared grid math
//!
//! Provides the pixel-space and grid-space value types used by the tile
//! resolver and the GeoJSON projector, plus the conversion from a
//! world-pixel rectangle to the inclusive tile-index rectangle covering it.

mod types;

pub use types::{
    LatLng, PixelBounds, Point, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM,
};

/// An inclusive rectangle of tile indices at a single zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl TileRange {
    /// Number of tiles covered by this range.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.max_x < self.min_x || self.max_y < self.min_y {
            return 0;
        }
        (self.max_x - self.min_x + 1) as u64 * (self.max_y - self.min_y + 1) as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converts a world-pixel rectangle to the inclusive tile-index rectangle
/// covering it.
///
/// The minimum corner is floored; the maximum corner is ceiled and pulled
/// back by one, so a rectangle whose max edge sits exactly on a tile
/// boundary does not spill into the next row or column. Each axis is
/// then clamped to at least the minimum index, so a zero-size rectangle
/// always covers exactly one tile even when the degenerate point sits on
/// a tile boundary.
///
/// # Arguments
///
/// * `bounds` - Pixel rectangle at the display zoom (`min <= max` per axis)
/// * `tile_size` - Tile edge length in pixels (positive)
#[inline]
pub fn px_bounds_to_tile_range(bounds: &PixelBounds, tile_size: u32) -> TileRange {
    let size = f64::from(tile_size);
    let min_x = (bounds.min.x / size).floor() as i64;
    let min_y = (bounds.min.y / size).floor() as i64;
    TileRange {
        min_x,
        min_y,
        max_x: ((bounds.max.x / size).ceil() as i64 - 1).max(min_x),
        max_y: ((bounds.max.y / size).ceil() as i64 - 1).max(min_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_bounds_at_zoom_one_cover_four_tiles() {
        // The whole world at zoom 1 is 512x512 px with 256 px tiles.
        let bounds = PixelBounds::from_coords(0.0, 0.0, 512.0, 512.0);
        let range = px_bounds_to_tile_range(&bounds, 256);

        assert_eq!(range.min_x, 0);
        assert_eq!(range.min_y, 0);
        assert_eq!(range.max_x, 1);
        assert_eq!(range.max_y, 1);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_interior_rectangle_within_one_tile() {
        let bounds = PixelBounds::from_coords(10.0, 20.0, 100.0, 200.0);
        let range = px_bounds_to_tile_range(&bounds, 256);

        assert_eq!(
            range,
            TileRange {
                min_x: 0,
                min_y: 0,
                max_x: 0,
                max_y: 0
            }
        );
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_max_edge_on_boundary_does_not_spill() {
        // Max corner exactly on a tile boundary stays in the lower tile.
        let bounds = PixelBounds::from_coords(0.0, 0.0, 256.0, 256.0);
        let range = px_bounds_to_tile_range(&bounds, 256);
        assert_eq!((range.max_x, range.max_y), (0, 0));
    }

    #[test]
    fn test_max_edge_past_boundary_spills() {
        let bounds = PixelBounds::from_coords(0.0, 0.0, 257.0, 256.0);
        let range = px_bounds_to_tile_range(&bounds, 256);
        assert_eq!((range.max_x, range.max_y), (1, 0));
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_zero_size_bounds_on_tile_boundary_yield_one_tile() {
        // A degenerate point exactly on a tile corner still covers one tile.
        let bounds = PixelBounds::from_coords(256.0, 256.0, 256.0, 256.0);
        let range = px_bounds_to_tile_range(&bounds, 256);
        assert_eq!(
            range,
            TileRange {
                min_x: 1,
                min_y: 1,
                max_x: 1,
                max_y: 1
            }
        );
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_zero_size_bounds_at_interior_point_yield_one_tile() {
        let bounds = PixelBounds::from_coords(300.0, 300.0, 300.0, 300.0);
        let range = px_bounds_to_tile_range(&bounds, 256);
        assert_eq!((range.min_x, range.min_y), (1, 1));
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_negative_pixel_coordinates_pass_through() {
        // West of the antimeridian: indices go negative, no wraparound.
        let bounds = PixelBounds::from_coords(-300.0, 0.0, 100.0, 100.0);
        let range = px_bounds_to_tile_range(&bounds, 256);
        assert_eq!(range.min_x, -2);
        assert_eq!(range.max_x, 0);
    }

    #[test]
    fn test_range_len_of_degenerate_range() {
        let range = TileRange {
            min_x: 5,
            min_y: 5,
            max_x: 5,
            max_y: 5,
        };
        assert_eq!(range.len(), 1);
        assert!(!range.is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_range_contains_both_corners(
                min_x in -1_000_000.0..1_000_000.0_f64,
                min_y in -1_000_000.0..1_000_000.0_f64,
                width in 1.0..100_000.0_f64,
                height in 1.0..100_000.0_f64,
                tile_size in prop::sample::select(vec![256u32, 512, 1024]),
            ) {
                let bounds = PixelBounds::from_coords(
                    min_x, min_y, min_x + width, min_y + height,
                );
                let range = px_bounds_to_tile_range(&bounds, tile_size);
                let size = f64::from(tile_size);

                // The floored min corner is always inside the range.
                prop_assert_eq!(range.min_x, (min_x / size).floor() as i64);
                prop_assert_eq!(range.min_y, (min_y / size).floor() as i64);
                prop_assert!(range.max_x >= range.min_x);
                prop_assert!(range.max_y >= range.min_y);
            }

            #[test]
            fn test_zero_size_bounds_always_cover_one_tile(
                x in -1_000_000.0..1_000_000.0_f64,
                y in -1_000_000.0..1_000_000.0_f64,
                tile_size in prop::sample::select(vec![256u32, 512, 1024]),
            ) {
                let bounds = PixelBounds::from_coords(x, y, x, y);
                let range = px_bounds_to_tile_range(&bounds, tile_size);
                prop_assert_eq!(range.len(), 1);
            }

            #[test]
            fn test_range_len_matches_extent(
                min_x in -1000.0..1000.0_f64,
                min_y in -1000.0..1000.0_f64,
                width in 1.0..5000.0_f64,
                height in 1.0..5000.0_f64,
            ) {
                let bounds = PixelBounds::from_coords(
                    min_x, min_y, min_x + width, min_y + height,
                );
                let range = px_bounds_to_tile_range(&bounds, 256);
                let expected = (range.max_x - range.min_x + 1) as u64
                    * (range.max_y - range.min_y + 1) as u64;
                prop_assert_eq!(range.len(), expected);
            }
        }
    }
}
