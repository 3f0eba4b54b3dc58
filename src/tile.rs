// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Integer tile-grid coordinates used throughout the router.
//!
//! Every position is expressed on a 2³¹ × 2³¹ spherical-mercator grid,
//! with `x` growing eastwards and `y` growing southwards. A tile at zoom `z`
//! covers a square of `2^(31 - z)` grid units.

/// Maximum zoom level of the grid - a tile at this zoom is a single grid unit.
pub const MAX_ZOOM: u32 = 31;

const GRID_SIZE: f64 = (1u64 << MAX_ZOOM) as f64;
const MAX_GRID_COORDINATE: f64 = GRID_SIZE - 1.0;

/// Latitudes beyond this limit are clamped, as spherical mercator can't represent the poles.
const MAX_LATITUDE: f64 = 85.0511;

/// Position expressed in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Position on the 31-bit tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point31 {
    pub x: u32,
    pub y: u32,
}

impl Point31 {
    /// Creates a point from grid coordinates, which must both be below 2^31.
    pub fn new(x: u32, y: u32) -> Self {
        debug_assert!(x < 1 << 31 && y < 1 << 31);
        Self { x, y }
    }

    /// Projects a lat-lon position onto the grid. Latitudes are clamped to ±85.0511°.
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        let lon = lon.clamp(-180.0, 180.0);
        let x = (lon + 180.0) / 360.0 * GRID_SIZE;

        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let eval = (lat.tan() + 1.0 / lat.cos()).ln();
        let y = (1.0 - eval / std::f64::consts::PI) / 2.0 * GRID_SIZE;

        Self {
            x: x.clamp(0.0, MAX_GRID_COORDINATE) as u32,
            y: y.clamp(0.0, MAX_GRID_COORDINATE) as u32,
        }
    }

    pub fn to_lat_lon(self) -> LatLon {
        let lon = self.x as f64 / GRID_SIZE * 360.0 - 180.0;
        let n = std::f64::consts::PI - 2.0 * std::f64::consts::PI * self.y as f64 / GRID_SIZE;
        let lat = n.sinh().atan().to_degrees();
        LatLon { lat, lon }
    }

    /// Packs both coordinates into a single integer, unique for every grid position.
    #[inline]
    pub fn key(self) -> u64 {
        ((self.x as u64) << MAX_ZOOM) | self.y as u64
    }

    /// Returns the tile containing this point at the provided zoom.
    #[inline]
    pub fn tile(self, zoom: u32) -> TileKey {
        debug_assert!(zoom <= MAX_ZOOM);
        let shift = MAX_ZOOM - zoom;
        TileKey {
            x: self.x >> shift,
            y: self.y >> shift,
        }
    }
}

impl From<LatLon> for Point31 {
    fn from(value: LatLon) -> Self {
        Self::from_lat_lon(value.lat, value.lon)
    }
}

/// Identifies a single tile at some (externally known) zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    pub x: u32,
    pub y: u32,
}

impl TileKey {
    /// Returns the area covered by this tile at the provided zoom.
    pub fn bbox(self, zoom: u32) -> BBox31 {
        debug_assert!(zoom <= MAX_ZOOM);
        let shift = MAX_ZOOM - zoom;
        let left = (self.x as u64) << shift;
        let top = (self.y as u64) << shift;
        BBox31 {
            left: left as u32,
            top: top as u32,
            right: (left + (1 << shift)).min(GRID_SIZE as u64) as u32,
            bottom: (top + (1 << shift)).min(GRID_SIZE as u64) as u32,
        }
    }
}

/// Axis-aligned area of the grid. `left` and `top` are inclusive,
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BBox31 {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BBox31 {
    #[inline]
    pub fn contains(&self, p: Point31) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}
