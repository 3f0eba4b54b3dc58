// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Helpers for building small synthetic road networks in tests.

use crate::{Point31, Road, RoadKind, RoutingPolicy, TagValue};

/// Origin of the synthetic networks, aligned to tile boundaries up to zoom 1.
const BASE: i64 = 1 << 30;

/// Grid units per one step of [pt]. One horizontal step is 11 meters,
/// one vertical step is 18.63 meters.
const STEP: i64 = 1000;

/// Returns the grid point `x` steps east and `y` steps south of the network origin.
pub(crate) fn pt(x: i64, y: i64) -> Point31 {
    Point31::new((BASE + x * STEP) as u32, (BASE + y * STEP) as u32)
}

/// Creates a bidirectional line road through the given [pt] coordinates.
pub(crate) fn road(id: i64, points: &[(i64, i64)]) -> Road {
    Road::line(id, points.iter().map(|&(x, y)| pt(x, y)).collect())
}

/// Policy accepting all roads (except `highway=footway`) with a single, fixed speed.
/// Points tagged with `highway=traffic_signals` cost `signal_delay` seconds to pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UniformPolicy {
    pub(crate) speed: f64,
    pub(crate) signal_delay: f64,
}

impl Default for UniformPolicy {
    fn default() -> Self {
        Self {
            speed: 10.0,
            signal_delay: 0.0,
        }
    }
}

impl RoutingPolicy for UniformPolicy {
    fn accept_point(&self, tag: &TagValue) -> bool {
        tag.tag == "highway" && tag.value == "traffic_signals"
    }

    fn accept_line(&self, tag: &TagValue) -> bool {
        !(tag.tag == "highway" && tag.value == "footway")
    }

    fn accept_road(&self, road: &Road) -> bool {
        match road.kind {
            RoadKind::Point => road.types.iter().any(|t| self.accept_point(t)),
            RoadKind::Line => road.types.iter().all(|t| self.accept_line(t)),
        }
    }

    fn define_speed(&self, _road: &Road) -> f64 {
        self.speed
    }

    fn min_default_speed(&self) -> f64 {
        self.speed
    }

    fn max_default_speed(&self) -> f64 {
        self.speed
    }

    fn define_obstacle(&self, road: &Road, _point_index: usize) -> f64 {
        if road.kind == RoadKind::Point && road.tag("highway") == Some("traffic_signals") {
            self.signal_delay
        } else {
            0.0
        }
    }
}

macro_rules! assert_almost_eq {
    ($a:expr, $b:expr) => {
        assert!(
            (($a - $b).abs() < 1e-6),
            "assertion failed: {} ≈ {}",
            $a,
            $b
        )
    };
}

pub(crate) use assert_almost_eq;
