// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{LatLon, Point31};

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6_371_008.8;

/// Mean diameter of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Meters per one horizontal grid unit, as used by [square_root_dist].
const METERS_PER_X: f64 = 0.011;

/// Meters per one vertical grid unit, as used by [square_root_dist].
const METERS_PER_Y: f64 = 0.01863;

/// Approximates the distance between two grid points, in meters.
///
/// The metric is anisotropic - horizontal and vertical grid units are scaled by
/// fixed factors, tuned for mid-latitudes, instead of taking the mercator
/// scale of the actual latitude into account. This is the metric for
/// all internal routing costs and heuristics.
pub fn square_root_dist(a: Point31, b: Point31) -> f64 {
    let dx = (a.x as f64 - b.x as f64) * METERS_PER_X;
    let dy = (a.y as f64 - b.y as f64) * METERS_PER_Y;
    (dx * dx + dy * dy).sqrt()
}

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the `haversine formula <https://en.wikipedia.org/wiki/Haversine_formula>`_.
/// Returns the result in meters.
pub fn earth_distance(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().asin()
}
