// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::time::Instant;

use log::{info, warn};

use super::cache::SegmentId;
use super::context::{RoutingContext, SearchMetrics};
use super::result::{prepare_result, Route};
use super::search::{search, SegmentVisit};
use super::RoutingError;
use crate::Point31;

/// Finds a route between two positions, using the bidirectional A* search
/// over lazily loaded tiles of the context's [MapDataProvider](crate::MapDataProvider).
///
/// Both positions are first resolved to the closest road segments with
/// [RoutingContext::find_route_segment]. If any of them can't be resolved,
/// or if there is no route between them, an empty [Route] is returned.
///
/// # Example
///
/// ```
/// use tileroute::{find_route, MemoryMapData, Point31, Road, RoutingConfig, RoutingContext};
///
/// let a = Point31::new(1_000_000_000, 1_000_000_000);
/// let b = Point31::new(1_000_010_000, 1_000_000_000);
/// let data = MemoryMapData::from_roads([
///     Road::line(1, vec![a, b]).with_tag("highway", "residential"),
/// ]);
///
/// let mut ctx = RoutingContext::new(
///     &data,
///     &tileroute::osm::CAR_PROFILE,
///     RoutingConfig::default(),
/// );
/// let route = find_route(&mut ctx, a, b).unwrap();
/// assert_eq!(route.road_ids(), vec![1]);
/// ```
pub fn find_route<P: Into<Point31>>(
    ctx: &mut RoutingContext<'_>,
    start: P,
    end: P,
) -> Result<Route, RoutingError> {
    find_route_with_visitor(ctx, start, end, |_| {})
}

/// Like [find_route], but calls `visitor` for every segment popped from any of the
/// search frontiers.
pub fn find_route_with_visitor<P, V>(
    ctx: &mut RoutingContext<'_>,
    start: P,
    end: P,
    mut visitor: V,
) -> Result<Route, RoutingError>
where
    P: Into<Point31>,
    V: FnMut(&SegmentVisit<'_>),
{
    let start = start.into();
    let end = end.into();

    let Some(start_segment) = ctx.find_route_segment(start)? else {
        warn!("no road near the start position {:?}", start.to_lat_lon());
        return Ok(Route::default());
    };

    let Some(end_segment) = ctx.find_route_segment(end)? else {
        warn!("no road near the end position {:?}", end.to_lat_lon());
        return Ok(Route::default());
    };

    search_route(ctx, start_segment, end_segment, &mut visitor)
}

/// Finds a route between two already resolved segments.
pub fn search_route(
    ctx: &mut RoutingContext<'_>,
    start: SegmentId,
    end: SegmentId,
    visitor: &mut dyn FnMut(&SegmentVisit<'_>),
) -> Result<Route, RoutingError> {
    let started = Instant::now();
    let load_time_before = ctx.graph.load_time();
    ctx.visited_segments = 0;

    let outcome = search(ctx, start, end, visitor)?;
    let segments = match &outcome.meeting {
        Some(meeting) => prepare_result(
            &ctx.graph,
            ctx.policy,
            &outcome.forward,
            &outcome.backward,
            meeting,
        ),
        None => Vec::default(),
    };

    let metrics = SearchMetrics {
        visited_segments: ctx.visited_segments,
        loaded_tiles: ctx.graph.loaded_tiles(),
        load_time: ctx.graph.load_time() - load_time_before,
        search_time: started.elapsed(),
    };
    let route = Route { segments, metrics };

    if route.is_empty() {
        info!(
            "no route found; {} segments visited, {} tiles loaded in {:.3} s, search took {:.3} s",
            metrics.visited_segments,
            metrics.loaded_tiles,
            metrics.load_time.as_secs_f64(),
            metrics.search_time.as_secs_f64(),
        );
    } else {
        info!(
            "route found: {} segments, {:.0} m, {:.0} s; {} segments visited, {} tiles loaded in {:.3} s, search took {:.3} s",
            route.segments.len(),
            route.total_distance(),
            route.total_time(),
            metrics.visited_segments,
            metrics.loaded_tiles,
            metrics.load_time.as_secs_f64(),
            metrics.search_time.as_secs_f64(),
        );
    }

    Ok(route)
}
