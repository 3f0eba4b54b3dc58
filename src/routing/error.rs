// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::DataAccessError;

/// Recommended number of allowed segment expansions in [find_route](crate::find_route)
/// before [RoutingError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during [find_route](crate::find_route).
///
/// Absence of a route is not an error - an empty [Route](crate::Route) is returned instead.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The [MapDataProvider](crate::MapDataProvider) failed to return roads for a tile.
    #[error("failed to load map data: {0}")]
    DataAccess(#[from] DataAccessError),

    /// Route search has exceeded its limit of steps.
    /// Either the points are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole reachable
    /// network, which can result in a denial-of-service. The step limit protects
    /// against resource exhaustion.
    #[error("step limit exceeded")]
    StepLimitExceeded,

    /// The search was interrupted through the
    /// [cancellation token](crate::RoutingContext::cancellation_token).
    #[error("route search cancelled")]
    Cancelled,
}
