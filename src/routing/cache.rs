// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::distance::square_root_dist;
use crate::provider::SEARCH_DETAIL_ZOOM;
use crate::{
    DataAccessError, MapDataProvider, Point31, Road, RoadKind, RoutingPolicy, SearchRequest,
    TileKey,
};

/// Handle of a single [Segment] - a (road, point index) pair - in a [TileGraph].
///
/// Handles are only meaningful for the [RoutingContext](crate::RoutingContext) which returned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) usize);

/// Occurrence of a point of a road in the graph. All segments sharing the same
/// grid point are linked together into a chain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    /// Slot of the road in [TileGraph::roads]
    pub(crate) slot: usize,
    pub(crate) point: usize,
    pub(crate) next: Option<SegmentId>,
}

/// Lazily-populated routing graph.
///
/// Tiles are loaded from a [MapDataProvider] on first access, and all points
/// of the loaded roads are indexed by their grid position. Tile loads are idempotent,
/// and every road is stored at most once - if a more complete copy of a road arrives
/// with a later tile, the older copy is unlinked from all chains.
#[derive(Debug)]
pub(crate) struct TileGraph {
    zoom: u32,
    loaded: HashSet<TileKey>,
    roads: Vec<Arc<Road>>,
    slots: HashMap<i64, usize>,
    segments: Vec<Segment>,
    chains: HashMap<u64, SegmentId>,
    load_time: Duration,
}

impl TileGraph {
    pub(crate) fn new(zoom: u32) -> Self {
        Self {
            zoom,
            loaded: HashSet::default(),
            roads: Vec::default(),
            slots: HashMap::default(),
            segments: Vec::default(),
            chains: HashMap::default(),
            load_time: Duration::ZERO,
        }
    }

    pub(crate) fn loaded_tiles(&self) -> usize {
        self.loaded.len()
    }

    pub(crate) fn load_time(&self) -> Duration {
        self.load_time
    }

    /// Ensures roads of the given tile are present in the graph.
    pub(crate) fn load_tile(
        &mut self,
        provider: &dyn MapDataProvider,
        policy: &dyn RoutingPolicy,
        tile: TileKey,
    ) -> Result<(), DataAccessError> {
        if self.loaded.contains(&tile) {
            return Ok(());
        }

        let started = Instant::now();
        let request = SearchRequest {
            bbox: tile.bbox(self.zoom),
            zoom: SEARCH_DETAIL_ZOOM,
        };
        let roads = provider.search_roads(&request, &mut |road| policy.accept_road(road))?;

        let total = roads.len();
        let mut added: usize = 0;
        for road in roads {
            if self.insert_road(road) {
                added += 1;
            }
        }

        self.loaded.insert(tile);
        self.load_time += started.elapsed();
        debug!(
            "loaded tile {}/{}/{}: {} roads, {} new or replaced",
            self.zoom, tile.x, tile.y, total, added,
        );
        Ok(())
    }

    /// Loads the tile containing `point` and returns the head of the chain of segments
    /// at that point.
    pub(crate) fn neighbors_at(
        &mut self,
        provider: &dyn MapDataProvider,
        policy: &dyn RoutingPolicy,
        point: Point31,
    ) -> Result<Option<SegmentId>, DataAccessError> {
        self.load_tile(provider, policy, point.tile(self.zoom))?;
        Ok(self.chains.get(&point.key()).copied())
    }

    fn insert_road(&mut self, road: Arc<Road>) -> bool {
        if let Some(&slot) = self.slots.get(&road.id) {
            if self.roads[slot].len() >= road.len() {
                return false;
            }
            trace!(
                "replacing partial road {} ({} -> {} points)",
                road.id,
                self.roads[slot].len(),
                road.len(),
            );
            self.unlink(slot);
        }

        let slot = self.roads.len();
        self.slots.insert(road.id, slot);
        for (point, p) in road.points.iter().enumerate() {
            let id = SegmentId(self.segments.len());
            let next = self.chains.insert(p.key(), id);
            self.segments.push(Segment { slot, point, next });
        }
        self.roads.push(road);
        return true;
    }

    /// Removes all segments of the road stored at `slot` from their chains.
    fn unlink(&mut self, slot: usize) {
        let road = Arc::clone(&self.roads[slot]);
        for p in &road.points {
            let key = p.key();

            let mut head = self.chains.get(&key).copied();
            while let Some(id) = head.filter(|id| self.segments[id.0].slot == slot) {
                head = self.segments[id.0].next;
            }

            match head {
                Some(id) => self.chains.insert(key, id),
                None => self.chains.remove(&key),
            };

            let mut current = head;
            while let Some(id) = current {
                let next = self.segments[id.0].next;
                match next {
                    Some(n) if self.segments[n.0].slot == slot => {
                        self.segments[id.0].next = self.segments[n.0].next;
                    }
                    _ => current = next,
                }
            }
        }
    }

    #[inline]
    pub(crate) fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }

    #[inline]
    pub(crate) fn road_of(&self, id: SegmentId) -> &Arc<Road> {
        &self.roads[self.segments[id.0].slot]
    }

    #[inline]
    pub(crate) fn point_of(&self, id: SegmentId) -> Point31 {
        let s = &self.segments[id.0];
        self.roads[s.slot].points[s.point]
    }

    /// Returns the current copy of the road with the provided id.
    pub(crate) fn road(&self, road_id: i64) -> Option<&Arc<Road>> {
        self.slots.get(&road_id).map(|&slot| &self.roads[slot])
    }

    /// Iterates over a chain starting at `head`.
    pub(crate) fn chain(&self, head: Option<SegmentId>) -> Chain<'_> {
        Chain {
            graph: self,
            current: head,
        }
    }

    /// Iterates over all segments at the given point, without loading any tiles.
    pub(crate) fn chain_at(&self, point: Point31) -> Chain<'_> {
        self.chain(self.chains.get(&point.key()).copied())
    }

    /// Finds the segment of the current copy of `road_id` at `point` index.
    pub(crate) fn find_segment(&self, road_id: i64, point: usize) -> Option<SegmentId> {
        let &slot = self.slots.get(&road_id)?;
        let p = *self.roads[slot].points.get(point)?;
        self.chain_at(p).find(|&id| {
            let s = self.segment(id);
            s.slot == slot && s.point == point
        })
    }

    /// Finds the segment closest to `p` among all loaded line roads.
    ///
    /// The closeness of a road piece between points `j-1` and `j` is measured as the
    /// detour `dist(p[j-1], p) + dist(p[j], p) - dist(p[j-1], p[j])`, and the segment
    /// starting at `j-1` is returned. Ties are resolved in favor of earlier-loaded roads.
    pub(crate) fn nearest_segment(&self, p: Point31) -> Option<SegmentId> {
        let mut best: Option<(f64, i64, usize)> = None;

        for (slot, road) in self.roads.iter().enumerate() {
            if road.kind != RoadKind::Line || self.slots.get(&road.id) != Some(&slot) {
                continue;
            }
            if road.len() < 2 {
                trace!("road {} has {} points - skipping", road.id, road.len());
                continue;
            }

            let mut prev_dist = square_root_dist(road.points[0], p);
            for j in 1..road.len() {
                let current_dist = square_root_dist(road.points[j], p);
                let piece = square_root_dist(road.points[j - 1], road.points[j]);
                let detour = prev_dist + current_dist - piece;
                if best.map_or(true, |(best_detour, _, _)| detour < best_detour) {
                    best = Some((detour, road.id, j - 1));
                }
                prev_dist = current_dist;
            }
        }

        let (_, road_id, point) = best?;
        self.find_segment(road_id, point)
    }
}

/// Iterator over a chain of [Segment]s sharing a single grid point.
pub(crate) struct Chain<'a> {
    graph: &'a TileGraph,
    current: Option<SegmentId>,
}

impl Iterator for Chain<'_> {
    type Item = SegmentId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.graph.segment(id).next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pt, road, UniformPolicy};
    use crate::MemoryMapData;

    const ZOOM: u32 = 13;

    fn chain_roads(g: &TileGraph, p: Point31) -> Vec<(i64, usize)> {
        let mut roads: Vec<(i64, usize)> = g
            .chain_at(p)
            .map(|id| (g.road_of(id).id, g.segment(id).point))
            .collect();
        roads.sort();
        roads
    }

    #[test]
    fn load_tile_is_idempotent() {
        let data = MemoryMapData::from_roads([
            road(1, &[(0, 0), (10, 0)]),
            road(2, &[(10, 0), (10, 10)]),
        ]);
        let policy = UniformPolicy::default();
        let mut g = TileGraph::new(ZOOM);

        let tile = pt(0, 0).tile(ZOOM);
        g.load_tile(&data, &policy, tile).unwrap();
        g.load_tile(&data, &policy, tile).unwrap();
        assert_eq!(g.loaded_tiles(), 1);

        assert_eq!(chain_roads(&g, pt(10, 0)), vec![(1, 1), (2, 0)]);
        assert_eq!(chain_roads(&g, pt(0, 0)), vec![(1, 0)]);
        assert_eq!(chain_roads(&g, pt(10, 10)), vec![(2, 1)]);
        assert_eq!(chain_roads(&g, pt(5, 5)), vec![]);
    }

    #[test]
    fn roads_crossing_tiles_are_stored_once() {
        // Tiles at zoom 13 span 262 steps; road 1 crosses the tile boundary
        let data = MemoryMapData::from_roads([road(1, &[(-10, 0), (10, 0)])]);
        let policy = UniformPolicy::default();
        let mut g = TileGraph::new(ZOOM);

        let left = g.neighbors_at(&data, &policy, pt(-10, 0)).unwrap();
        assert!(left.is_some());
        let right = g.neighbors_at(&data, &policy, pt(10, 0)).unwrap();
        assert!(right.is_some());
        assert_eq!(g.loaded_tiles(), 2);

        assert_eq!(chain_roads(&g, pt(-10, 0)), vec![(1, 0)]);
        assert_eq!(chain_roads(&g, pt(10, 0)), vec![(1, 1)]);
    }

    #[test]
    fn partial_copies_are_replaced() {
        let data = MemoryMapData::from_roads([
            road(1, &[(-20, 0), (-10, 0)]),
            road(1, &[(-20, 0), (-10, 0), (10, 0)]),
        ]);
        let policy = UniformPolicy::default();
        let mut g = TileGraph::new(ZOOM);

        g.load_tile(&data, &policy, pt(-10, 0).tile(ZOOM)).unwrap();
        assert_eq!(g.road(1).unwrap().len(), 3);
        assert_eq!(chain_roads(&g, pt(-20, 0)), vec![(1, 0)]);
        assert_eq!(chain_roads(&g, pt(-10, 0)), vec![(1, 1)]);

        g.load_tile(&data, &policy, pt(10, 0).tile(ZOOM)).unwrap();
        assert_eq!(chain_roads(&g, pt(-10, 0)), vec![(1, 1)]);
        assert_eq!(chain_roads(&g, pt(10, 0)), vec![(1, 2)]);
        assert_eq!(g.find_segment(1, 2).map(|id| g.point_of(id)), Some(pt(10, 0)));
    }

    #[test]
    fn partial_copy_arriving_first_is_unlinked() {
        // The first tile only sees the short copy; the longer one arrives with the second tile.
        let data = MemoryMapData::from_roads([
            road(1, &[(-10, 0), (5, 0)]),
            road(2, &[(-10, 0), (-10, 10)]),
            road(1, &[(5, 0), (10, 0), (20, 0)]),
        ]);
        let policy = UniformPolicy::default();
        let mut g = TileGraph::new(ZOOM);

        g.load_tile(&data, &policy, pt(-10, 0).tile(ZOOM)).unwrap();
        assert_eq!(g.road(1).unwrap().len(), 2);
        assert_eq!(chain_roads(&g, pt(-10, 0)), vec![(1, 0), (2, 0)]);

        g.load_tile(&data, &policy, pt(10, 0).tile(ZOOM)).unwrap();
        assert_eq!(g.road(1).unwrap().len(), 3);
        assert_eq!(chain_roads(&g, pt(-10, 0)), vec![(2, 0)]);
        assert_eq!(chain_roads(&g, pt(5, 0)), vec![(1, 0)]);
        assert_eq!(chain_roads(&g, pt(20, 0)), vec![(1, 2)]);
    }

    #[test]
    fn rejected_roads_are_not_loaded() {
        let data = MemoryMapData::from_roads([
            road(1, &[(0, 0), (10, 0)]),
            road(2, &[(0, 0), (0, 10)]).with_tag("highway", "footway"),
        ]);
        let policy = UniformPolicy::default();
        let mut g = TileGraph::new(ZOOM);

        g.load_tile(&data, &policy, pt(0, 0).tile(ZOOM)).unwrap();
        assert_eq!(chain_roads(&g, pt(0, 0)), vec![(1, 0)]);
        assert!(g.road(2).is_none());
    }

    #[test]
    fn nearest_segment() {
        let data = MemoryMapData::from_roads([
            road(1, &[(0, 0), (10, 0), (20, 0)]),
            road(2, &[(0, 10), (20, 10)]),
            road(3, &[(30, 30)]),
        ]);
        let policy = UniformPolicy::default();
        let mut g = TileGraph::new(ZOOM);
        g.load_tile(&data, &policy, pt(0, 0).tile(ZOOM)).unwrap();

        let found = |p: Point31| {
            g.nearest_segment(p)
                .map(|id| (g.road_of(id).id, g.segment(id).point))
        };
        assert_eq!(found(pt(5, 1)), Some((1, 0)));
        assert_eq!(found(pt(15, -1)), Some((1, 1)));
        assert_eq!(found(pt(10, 9)), Some((2, 0)));
        assert_eq!(found(pt(30, 30)), Some((2, 0)));
    }

    #[test]
    fn nearest_segment_in_empty_graph() {
        let g = TileGraph::new(ZOOM);
        assert_eq!(g.nearest_segment(pt(0, 0)), None);
    }
}
