//! Clustering traits.

use crate::error::Result;
use crate::points::{CenterSet, PointSet};

/// Trait for clustering algorithms.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}

/// Output of one unconstrained clustering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedModel {
    /// Final centroids.
    pub centers: CenterSet,
    /// Nearest-centroid labels (unbalanced). Diagnostic only.
    pub labels: Vec<usize>,
    /// Inner iterations actually run.
    pub iterations: usize,
    /// Within-cluster sum of squares for `labels`.
    pub inertia: f64,
}

/// Unconstrained clustering backend used to seed each balancing round.
///
/// Implementations must return exactly `k` centers, and when `warm_start` is
/// given they must start from (and keep the cardinality of) those centers.
pub trait SeedClusterer {
    /// Cluster `points` into `k` groups.
    fn fit(
        &self,
        points: &PointSet,
        k: usize,
        warm_start: Option<&CenterSet>,
    ) -> Result<SeedModel>;
}
