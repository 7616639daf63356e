//! Coordinate reference system abstraction
//!
//! The resolver only needs two things from a CRS: the projected pixel
//! extent of the world at a zoom level (to derive the TMS row-inversion
//! constant) and the inverse transform from a world pixel back to a
//! geographic coordinate (for the GeoJSON projector).
//!
//! [`WebMercator`] implements the spherical Mercator projection used by
//! virtually every raster tile source (EPSG:3857).

use std::f64::consts::PI;

use crate::coord::{LatLng, PixelBounds, Point};

/// Base tile edge length the Web Mercator pixel grid is derived from.
const BASE_TILE_SIZE: f64 = 256.0;

/// Projection interface consumed by the resolver and the projector.
///
/// Implementations must be pure: the same inputs always produce the same
/// outputs, with no interior mutability. This keeps the resolver safely
/// callable from any number of tasks concurrently.
pub trait Crs: Send + Sync {
    /// Total projected pixel bounds of the world at `zoom`.
    fn projected_bounds(&self, zoom: u8) -> PixelBounds;

    /// Inverse transform from a world pixel at `zoom` back to latitude
    /// and longitude.
    fn pixel_to_geo(&self, point: Point, zoom: u8) -> LatLng;
}

/// Spherical Web Mercator (EPSG:3857).
///
/// The world at zoom `z` spans `256 * 2^z` pixels per axis, origin at the
/// northwest corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl WebMercator {
    /// World edge length in pixels at the given zoom.
    #[inline]
    fn scale(zoom: u8) -> f64 {
        BASE_TILE_SIZE * 2.0_f64.powi(i32::from(zoom))
    }
}

impl Crs for WebMercator {
    #[inline]
    fn projected_bounds(&self, zoom: u8) -> PixelBounds {
        let scale = Self::scale(zoom);
        PixelBounds::from_coords(0.0, 0.0, scale, scale)
    }

    #[inline]
    fn pixel_to_geo(&self, point: Point, zoom: u8) -> LatLng {
        let scale = Self::scale(zoom);

        // Longitude is linear in x.
        let lng = point.x / scale * 360.0 - 180.0;

        // Latitude via inverse spherical Mercator.
        let y = point.y / scale;
        let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
        let lat = lat_rad * 180.0 / PI;

        LatLng::new(lat, lng)
    }
}
