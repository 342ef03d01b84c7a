//! Per-cluster route optimization.

use crate::cluster::ClusterResult;
use crate::error::{Error, Result};
use tracing::debug;

/// Orders a small set of `[lon, lat]` stops into a route.
pub trait Router {
    /// Whatever the service returns for one route.
    type Route;

    /// Optimize one route. Stops arrive in input order.
    fn optimize(&self, stops: &[[f64; 2]]) -> Result<Self::Route>;
}

/// Cluster sizes a router accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteBounds {
    /// Fewest stops (a single stop has no route).
    pub min: usize,
    /// Most stops the service will optimize in one request.
    pub max: usize,
}

impl Default for RouteBounds {
    fn default() -> Self {
        Self { min: 2, max: 12 }
    }
}

impl RouteBounds {
    /// Bounds `min..=max`.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min == 0 || min > max {
            return Err(Error::InvalidParameter {
                name: "bounds",
                message: "need 1 <= min <= max",
            });
        }
        Ok(Self { min, max })
    }

    /// Check that `cluster` with `size` stops can be routed.
    pub fn check(&self, cluster: usize, size: usize) -> Result<()> {
        if size < self.min || size > self.max {
            return Err(Error::RouteInfeasible {
                cluster,
                size,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Routing outcome for one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRoute<R> {
    /// Cluster label.
    pub cluster: usize,
    /// Point indices of the stops, in the order sent to the router.
    pub stops: Vec<usize>,
    /// The router's answer, or why the cluster was not routed.
    pub route: Result<R>,
}

/// Route every cluster of `result` independently.
///
/// Clusters outside `bounds` are reported as [`Error::RouteInfeasible`]
/// without calling the router. Points must be 2-D (`[lon, lat]`).
pub fn route_clusters<R>(
    result: &ClusterResult,
    router: &R,
    bounds: RouteBounds,
) -> Result<Vec<ClusterRoute<R::Route>>>
where
    R: Router + ?Sized,
{
    if result.points.dim() != 2 {
        return Err(Error::DimensionMismatch {
            expected: 2,
            found: result.points.dim(),
        });
    }

    let k = result.assignment.n_clusters();
    let mut out = Vec::with_capacity(k);

    for cluster in 0..k {
        let stops = result.members(cluster);
        let route = match bounds.check(cluster, stops.len()) {
            Ok(()) => {
                let coords: Vec<[f64; 2]> = stops
                    .iter()
                    .map(|&i| {
                        let p = result.points.row(i);
                        [p[0], p[1]]
                    })
                    .collect();
                router.optimize(&coords)
            }
            Err(e) => Err(e),
        };
        debug!(cluster, stops = stops.len(), ok = route.is_ok(), "routed cluster");
        out.push(ClusterRoute {
            cluster,
            stops,
            route,
        });
    }

    Ok(out)
}
