// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Point-to-point routing over a tiled road network, which is loaded lazily
//! as the search reaches new tiles.
//!
//! Roads come from a [MapDataProvider], are interpreted by a [RoutingPolicy]
//! and searched with a bidirectional A* supporting one-way roads, turn restrictions,
//! obstacle delays and configurable heuristics. [MemoryMapData] is a simple in-memory
//! provider, which can be filled from [OpenStreetMap](https://www.openstreetmap.org/)
//! data by the [osm] module.
//!
//! # Example
//!
//! ```no_run
//! let options = tileroute::osm::Options {
//!     profile: &tileroute::osm::CAR_PROFILE,
//!     file_format: tileroute::osm::FileFormat::Unknown,
//! };
//! let data = tileroute::osm::load_from_file(&options, "path/to/monaco.osm")
//!     .expect("failed to load monaco.osm");
//!
//! let mut ctx = tileroute::RoutingContext::new(
//!     &data,
//!     &tileroute::osm::CAR_PROFILE,
//!     tileroute::RoutingConfig::default(),
//! );
//! let route = tileroute::find_route(
//!     &mut ctx,
//!     tileroute::LatLon::new(43.7384, 7.4246),
//!     tileroute::LatLon::new(43.7478, 7.4323),
//! )
//! .expect("failed to find route");
//!
//! println!("Route: {:?}", route.road_ids());
//! ```

mod distance;
pub mod osm;
mod policy;
mod provider;
mod road;
mod routing;
mod tile;

#[cfg(test)]
mod testing;

pub use distance::{earth_distance, square_root_dist};
pub use policy::RoutingPolicy;
pub use provider::{
    DataAccessError, MapDataProvider, MemoryMapData, SearchRequest, SEARCH_DETAIL_ZOOM,
};
pub use road::{Restriction, RestrictionKind, Road, RoadKind, TagValue};
pub use routing::{
    find_route, find_route_with_visitor, search_route, Route, RouteSegmentResult, RoutingConfig,
    RoutingContext, RoutingError, SearchDirection, SearchMetrics, SegmentId, SegmentVisit,
    DEFAULT_STEP_LIMIT,
};
pub use tile::{BBox31, LatLon, Point31, TileKey, MAX_ZOOM};
