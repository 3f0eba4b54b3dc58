// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod cache;
mod context;
mod error;
mod planner;
mod restriction;
mod result;
mod search;

pub use cache::SegmentId;
pub use context::{RoutingConfig, RoutingContext, SearchDirection, SearchMetrics};
pub use error::{RoutingError, DEFAULT_STEP_LIMIT};
pub use planner::{find_route, find_route_with_visitor, search_route};
pub use result::{Route, RouteSegmentResult};
pub use search::SegmentVisit;
