// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::cache::{SegmentId, TileGraph};
use super::context::SearchMetrics;
use super::search::{Frontier, Meeting};
use crate::distance::square_root_dist;
use crate::{LatLon, Point31, Road, RoutingPolicy};

/// Piece of a [Route] traveled along a single road, from `start_point_index`
/// to `end_point_index` (inclusive). The indices may be in decreasing order,
/// if the road is traveled backwards.
#[derive(Debug, Clone)]
pub struct RouteSegmentResult {
    pub road: Arc<Road>,
    pub start_point_index: usize,
    pub end_point_index: usize,
    pub start: LatLon,
    pub end: LatLon,

    /// Length of the piece along the road geometry, in meters.
    pub distance: f64,

    /// Time to travel the piece at the road's speed, in seconds.
    pub time: f64,
}

impl RouteSegmentResult {
    fn new(
        road: Arc<Road>,
        start_point_index: usize,
        end_point_index: usize,
        policy: &dyn RoutingPolicy,
    ) -> Self {
        let (lo, hi) = if start_point_index <= end_point_index {
            (start_point_index, end_point_index)
        } else {
            (end_point_index, start_point_index)
        };
        let distance: f64 = road.points[lo..=hi]
            .windows(2)
            .map(|w| square_root_dist(w[0], w[1]))
            .sum();

        let mut speed = policy.define_speed(&road);
        if speed <= 0.0 {
            speed = policy.min_default_speed();
        }

        Self {
            start: road.points[start_point_index].to_lat_lon(),
            end: road.points[end_point_index].to_lat_lon(),
            road,
            start_point_index,
            end_point_index,
            distance,
            time: distance / speed,
        }
    }

    /// Returns true if the road is traveled in the direction of increasing point indices.
    pub fn is_forward(&self) -> bool {
        self.start_point_index <= self.end_point_index
    }

    /// Returns the traveled points, in travel order.
    pub fn points(&self) -> Vec<Point31> {
        if self.is_forward() {
            self.road.points[self.start_point_index..=self.end_point_index].to_vec()
        } else {
            self.road.points[self.end_point_index..=self.start_point_index]
                .iter()
                .rev()
                .copied()
                .collect()
        }
    }
}

/// Result of a route search - an ordered list of road pieces from the start to the end.
///
/// An empty list means no route was found.
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub segments: Vec<RouteSegmentResult>,
    pub metrics: SearchMetrics,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total travel time, in seconds.
    pub fn total_time(&self) -> f64 {
        self.segments.iter().map(|s| s.time).sum()
    }

    /// Total length, in meters.
    pub fn total_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.distance).sum()
    }

    /// Returns the ids of traveled roads, in travel order.
    pub fn road_ids(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.road.id).collect()
    }
}

/// Single-road piece of the search trees, as (segment, start index, end index).
type Hop = (SegmentId, usize, usize);

/// Walks both search trees from the meeting point back to their origins,
/// and assembles the route in travel order.
pub(crate) fn prepare_result(
    graph: &TileGraph,
    policy: &dyn RoutingPolicy,
    forward: &Frontier,
    backward: &Frontier,
    meeting: &Meeting,
) -> Vec<RouteSegmentResult> {
    let mut hops = direct_hops(graph, forward, meeting.direct, meeting.direct_end);
    hops.extend(reverse_hops(graph, backward, meeting.reverse, meeting.reverse_end));
    let hops = merge_hops(graph, hops);

    hops.into_iter()
        .map(|(segment, start, end)| {
            RouteSegmentResult::new(Arc::clone(graph.road_of(segment)), start, end, policy)
        })
        .collect()
}

/// Hops of the forward tree, from the start to the meeting point.
fn direct_hops(graph: &TileGraph, forward: &Frontier, last: SegmentId, last_end: usize) -> Vec<Hop> {
    let mut hops = Vec::default();
    let mut current = Some(last);
    let mut end = last_end;

    while let Some(segment) = current {
        let Some(label) = forward.label(segment) else {
            break;
        };

        let mut start = graph.segment(segment).point;
        let hop_end = end;
        current = label.parent;
        end = label.parent_end;

        // The start position lies between the origin point and the next one -
        // don't go back to the origin point if traveling towards higher indices.
        if current.is_none() && start < hop_end {
            start += 1;
        }

        if start != hop_end {
            hops.push((segment, start, hop_end));
        }
    }

    hops.reverse();
    return hops;
}

/// Joins consecutive hops along the same road, which happens when both trees meet
/// on one of their origin roads.
fn merge_hops(graph: &TileGraph, hops: Vec<Hop>) -> Vec<Hop> {
    let mut merged: Vec<Hop> = Vec::with_capacity(hops.len());
    for hop in hops {
        if let Some(prev) = merged.last_mut() {
            let same_road = graph.road_of(prev.0).id == graph.road_of(hop.0).id;
            if same_road && prev.2 == hop.1 {
                prev.2 = hop.2;
                if prev.1 == prev.2 {
                    merged.pop();
                }
                continue;
            }
        }
        merged.push(hop);
    }
    return merged;
}

/// Hops of the reverse tree, from the meeting point to the end.
fn reverse_hops(graph: &TileGraph, backward: &Frontier, first: SegmentId, first_start: usize) -> Vec<Hop> {
    let mut hops = Vec::default();
    let mut current = Some(first);
    let mut start = first_start;

    while let Some(segment) = current {
        let Some(label) = backward.label(segment) else {
            break;
        };

        let mut end = graph.segment(segment).point;
        let hop_start = start;
        current = label.parent;
        start = label.parent_end;

        // The end position lies between the origin point and the next one -
        // travel up to the next point unless it was already passed.
        if current.is_none() && hop_start >= end && end + 1 < graph.road_of(segment).len() {
            end += 1;
        }

        if hop_start != end {
            hops.push((segment, hop_start, end));
        }
    }

    return hops;
}
