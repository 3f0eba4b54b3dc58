// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::cache::{SegmentId, TileGraph};
use super::RoutingError;
use crate::{MapDataProvider, Point31, RoutingPolicy, TileKey, DEFAULT_STEP_LIMIT};

/// Which of the two search frontiers is expanded at each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    /// Strictly alternate between the forward and the reverse frontier.
    #[default]
    Bidirectional,

    /// Only expand the frontier growing from the start.
    Forward,

    /// Only expand the frontier growing from the end.
    Reverse,
}

/// Options controlling the route search.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    /// Zoom level of tiles requested from the [MapDataProvider].
    /// Must be at most 31.
    pub zoom_to_load_tiles: u32,

    /// Weight of the estimated remaining cost in queue priorities.
    /// Values above 1.0 trade route quality for search speed.
    pub heuristic_coefficient: f64,

    pub direction: SearchDirection,

    /// Divide heuristic estimates by
    /// [road_priority_to_calculate_route](RoutingPolicy::road_priority_to_calculate_route).
    pub dynamic_road_prioritising: bool,

    /// Skip continuations onto roads ranked lower (by
    /// [road_priority_heuristic_to_increase](RoutingPolicy::road_priority_heuristic_to_increase))
    /// than the current road.
    pub increasing_road_priorities: bool,

    /// Maximum number of segment expansions before
    /// [RoutingError::StepLimitExceeded] is returned.
    pub step_limit: usize,

    /// Return the first allowed meeting of both frontiers, instead of searching on
    /// until no cheaper meeting is possible. Faster, but the route may be suboptimal.
    pub stop_at_first_meeting: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            zoom_to_load_tiles: 13,
            heuristic_coefficient: 1.0,
            direction: SearchDirection::Bidirectional,
            dynamic_road_prioritising: false,
            increasing_road_priorities: false,
            step_limit: DEFAULT_STEP_LIMIT,
            stop_at_first_meeting: false,
        }
    }
}

/// Statistics of a single route search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchMetrics {
    /// Number of segments popped from both frontiers.
    pub visited_segments: usize,

    /// Number of tiles loaded into the context, including tiles loaded by earlier searches.
    pub loaded_tiles: usize,

    /// Time spent loading tiles during the search.
    pub load_time: Duration,

    /// Total time of the search, including `load_time`.
    pub search_time: Duration,
}

/// State shared by route searches over a single [MapDataProvider]:
/// the configuration, the [RoutingPolicy] and the cache of loaded tiles.
///
/// Loaded tiles are kept between searches - reuse a context
/// for multiple searches over the same area.
pub struct RoutingContext<'a> {
    pub(crate) config: RoutingConfig,
    pub(crate) policy: &'a dyn RoutingPolicy,
    provider: &'a dyn MapDataProvider,
    pub(crate) graph: TileGraph,
    pub(crate) visited_segments: usize,
    cancelled: Arc<AtomicBool>,
}

impl<'a> RoutingContext<'a> {
    pub fn new(
        provider: &'a dyn MapDataProvider,
        policy: &'a dyn RoutingPolicy,
        config: RoutingConfig,
    ) -> Self {
        assert!(config.zoom_to_load_tiles <= crate::tile::MAX_ZOOM);
        Self {
            graph: TileGraph::new(config.zoom_to_load_tiles),
            config,
            policy,
            provider,
            visited_segments: 0,
            cancelled: Arc::default(),
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn policy(&self) -> &'a dyn RoutingPolicy {
        self.policy
    }

    /// Returns a flag which, once set, makes any search running on this context
    /// fail with [RoutingError::Cancelled] at its next step.
    ///
    /// The flag is never reset by the context.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn loaded_tiles(&self) -> usize {
        self.graph.loaded_tiles()
    }

    /// Loads the provided tile (at [RoutingConfig::zoom_to_load_tiles]) into the cache.
    /// Does nothing if the tile was already loaded.
    pub fn load_tile(&mut self, tile: TileKey) -> Result<(), RoutingError> {
        self.graph.load_tile(self.provider, self.policy, tile)?;
        Ok(())
    }

    /// Loads the tile containing `point` and returns the chain of segments at that point.
    pub(crate) fn neighbors_at(&mut self, point: Point31) -> Result<Option<SegmentId>, RoutingError> {
        Ok(self.graph.neighbors_at(self.provider, self.policy, point)?)
    }

    /// Finds the road segment closest to the provided position, loading the tile
    /// containing it first. Returns `None` if there are no usable roads nearby.
    ///
    /// The returned segment is identified by its starting point - the closer
    /// position lies between that point and the following one.
    pub fn find_route_segment<P: Into<Point31>>(
        &mut self,
        at: P,
    ) -> Result<Option<SegmentId>, RoutingError> {
        let at = at.into();
        self.load_tile(at.tile(self.config.zoom_to_load_tiles))?;
        Ok(self.graph.nearest_segment(at))
    }

    /// Returns the id of the road and the point index of a segment.
    pub fn describe_segment(&self, segment: SegmentId) -> (i64, usize) {
        (
            self.graph.road_of(segment).id,
            self.graph.segment(segment).point,
        )
    }
}
