// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{BBox31, Road, TileKey};

/// Zoom level of detail requested from [MapDataProvider] by the routing cache.
pub const SEARCH_DETAIL_ZOOM: u32 = 15;

/// Zoom of the buckets used by [MemoryMapData] to index its roads.
const BUCKET_ZOOM: u32 = 14;

/// Queries covering more buckets fall back to a linear scan over all roads.
const MAX_QUERY_BUCKETS: u64 = 4096;

/// Error returned by [MapDataProvider] implementations.
#[derive(Debug, thiserror::Error)]
pub enum DataAccessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted map data: {0}")]
    Corrupted(String),
}

/// Area query issued against a [MapDataProvider].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest {
    pub bbox: BBox31,
    pub zoom: u32,
}

/// Source of road data for the router.
///
/// Implementations must return every road with at least one point inside
/// the requested bbox, for which `accept` returns true. The same road may be
/// returned by multiple requests, possibly as a partial copy with only the points
/// close to the requested area.
pub trait MapDataProvider {
    fn search_roads(
        &self,
        request: &SearchRequest,
        accept: &mut dyn FnMut(&Road) -> bool,
    ) -> Result<Vec<Arc<Road>>, DataAccessError>;
}

/// [MapDataProvider] keeping all of its roads in memory,
/// indexed by a grid of zoom-14 buckets.
#[derive(Debug, Default, Clone)]
pub struct MemoryMapData {
    roads: Vec<Arc<Road>>,
    buckets: HashMap<TileKey, Vec<usize>>,
}

impl MemoryMapData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roads<I: IntoIterator<Item = Road>>(roads: I) -> Self {
        let mut data = Self::default();
        for road in roads {
            data.add_road(road);
        }
        return data;
    }

    /// Adds a road to the store. Roads with the same id are not merged -
    /// queries may return all of their copies.
    pub fn add_road(&mut self, road: Road) {
        let idx = self.roads.len();
        let mut seen = HashSet::<TileKey>::default();
        for p in &road.points {
            let bucket = p.tile(BUCKET_ZOOM);
            if seen.insert(bucket) {
                self.buckets.entry(bucket).or_default().push(idx);
            }
        }
        self.roads.push(Arc::new(road));
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Road>> {
        self.roads.iter()
    }

    fn candidates(&self, bbox: &BBox31) -> Vec<usize> {
        let first = crate::Point31::new(bbox.left, bbox.top).tile(BUCKET_ZOOM);
        let last = crate::Point31::new(bbox.right - 1, bbox.bottom - 1).tile(BUCKET_ZOOM);
        let buckets = (last.x - first.x + 1) as u64 * (last.y - first.y + 1) as u64;

        if buckets > MAX_QUERY_BUCKETS {
            return (0..self.roads.len()).collect();
        }

        let mut candidates = Vec::default();
        for x in first.x..=last.x {
            for y in first.y..=last.y {
                if let Some(bucket) = self.buckets.get(&TileKey { x, y }) {
                    candidates.extend_from_slice(bucket);
                }
            }
        }
        candidates.sort_unstable();
        candidates.dedup();
        return candidates;
    }
}

impl MapDataProvider for MemoryMapData {
    fn search_roads(
        &self,
        request: &SearchRequest,
        accept: &mut dyn FnMut(&Road) -> bool,
    ) -> Result<Vec<Arc<Road>>, DataAccessError> {
        if request.bbox.is_empty() {
            return Ok(Vec::default());
        }

        let mut found = Vec::default();
        for idx in self.candidates(&request.bbox) {
            let road = &self.roads[idx];
            if road.points.iter().any(|&p| request.bbox.contains(p)) && accept(road) {
                found.push(Arc::clone(road));
            }
        }
        return Ok(found);
    }
}
