// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Road, RoadKind, TagValue};

/// Decides which roads are usable and how expensive they are to travel.
///
/// All speeds are expressed in meters per second, all times in seconds.
/// [Profile](crate::osm::Profile) is the stock implementation for OpenStreetMap-derived data.
pub trait RoutingPolicy {
    /// Returns true if a single-point feature with this tag should be loaded.
    fn accept_point(&self, tag: &TagValue) -> bool;

    /// Returns true if a line road with this tag should be loaded.
    fn accept_line(&self, tag: &TagValue) -> bool;

    /// Returns true if the road should be loaded - that is, if any of its tags is accepted
    /// by [accept_point](RoutingPolicy::accept_point) or [accept_line](RoutingPolicy::accept_line),
    /// depending on the road kind.
    fn accept_road(&self, road: &Road) -> bool {
        match road.kind {
            RoadKind::Point => road.types.iter().any(|t| self.accept_point(t)),
            RoadKind::Line => road.types.iter().any(|t| self.accept_line(t)),
        }
    }

    /// Returns true if the road may only be traveled in the direction of increasing point indices.
    fn is_one_way(&self, road: &Road) -> bool {
        road.one_way
    }

    /// Returns the travel speed over the road. Zero means "unknown" - the
    /// [min_default_speed](RoutingPolicy::min_default_speed) is used instead.
    fn define_speed(&self, road: &Road) -> f64;

    fn min_default_speed(&self) -> f64;

    /// Upper bound of all speeds returned by [define_speed](RoutingPolicy::define_speed),
    /// used to turn distances into heuristic times.
    fn max_default_speed(&self) -> f64;

    /// Returns the delay incurred when passing through the `point_index`-th point of `road`.
    fn define_obstacle(&self, _road: &Road, _point_index: usize) -> f64 {
        0.0
    }

    /// Returns the delay of a turn from `from` (at its `from_point` index)
    /// onto `to` (at its `to_point` index).
    fn calculate_turn_time(
        &self,
        _from: &Road,
        _from_point: usize,
        _to: &Road,
        _to_point: usize,
    ) -> f64 {
        0.0
    }

    /// Divisor of the heuristic estimate for segments of this road,
    /// used with dynamic road prioritising.
    fn road_priority_to_calculate_route(&self, _road: &Road) -> f64 {
        1.0
    }

    /// Rank of the road used with increasing road priorities - continuations onto
    /// roads with a lower rank than the current one are skipped.
    fn road_priority_heuristic_to_increase(&self, _road: &Road) -> f64 {
        1.0
    }

    /// Combines the known cost from the search origin and the estimated cost
    /// to the target into a queue priority.
    fn segment_priority(
        &self,
        distance_from_start: f64,
        distance_to_end: f64,
        heuristic_coefficient: f64,
    ) -> f64 {
        distance_from_start + heuristic_coefficient * distance_to_end
    }
}
