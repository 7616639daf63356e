//! Coordinate type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels commonly served by raster tile sources
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// A point in world-pixel space at some display zoom.
///
/// Pixel space has its origin at the top-left of the projected world;
/// `y` grows downward (rendering convention).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in world-pixel space.
///
/// `min` is the top-left corner, `max` the bottom-right. Callers must
/// supply `min <= max` per axis; the constructor does not reorder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    pub min: Point,
    pub max: Point,
}

impl PixelBounds {
    #[inline]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Builds bounds from raw corner coordinates.
    #[inline]
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Grid-space tile indices at a zoom level, rendering convention
/// (row 0 at the north edge, y grows downward) regardless of the
/// scheme a source serves.
///
/// Indices are signed: the resolver passes out-of-range values through
/// unnormalized, so coordinates west of the antimeridian or beyond the
/// world extent are representable. Keeping them in range is the
/// caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X index (east-west), 0 at the west edge of the world.
    pub x: i64,
    /// Y index (north-south), 0 at the north edge of the world.
    pub y: i64,
    /// Zoom level.
    pub z: u8,
}

impl TileCoord {
    #[inline]
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
