//! Equal-size k-means: the outer balancing loop.
//!
//! Each round runs four stages in order:
//!
//! 1. **Seed**: unconstrained k-means, warm-started from the previous round's
//!    balanced centers (round 1 uses k-means++ unless initial centers are given)
//! 2. **Distances**: `n × k` point-to-center matrix
//! 3. **Balance**: round robin with equal quotas, then remainder by nearest center
//! 4. **Update**: each center becomes the mean of its balanced members
//!
//! The updated centers feed the next round's seed. The loop runs a fixed
//! number of rounds; stopping early once the centers settle is opt-in via
//! [`EqualSizeKmeans::with_early_stop`].
//!
//! ```rust
//! use equisize::EqualSizeKmeans;
//!
//! let data = vec![
//!     vec![0.0, 0.0], vec![0.0, 1.0],
//!     vec![10.0, 0.0], vec![10.0, 1.0],
//!     vec![0.0, 10.0], vec![10.0, 10.0],
//! ];
//! let result = EqualSizeKmeans::new(3)
//!     .with_rounds(5)
//!     .with_seed(42)
//!     .fit(&data)
//!     .unwrap();
//! assert_eq!(result.cluster_sizes(), vec![2, 2, 2]);
//! ```

use super::balance::{balance, Assignment};
use super::centers::update_centers;
use super::distance::distance_matrix;
use super::kmeans::Kmeans;
use super::traits::{Clustering, SeedClusterer, SeedModel};
use crate::error::{Error, Result};
use crate::metrics;
use crate::points::{CenterSet, PointSet};
use ndarray::ArrayView1;
use tracing::{debug, warn};

/// Options for [`EqualSizeKmeans`].
#[derive(Debug, Clone, PartialEq)]
pub struct EqualSizeConfig {
    /// Outer balancing rounds.
    pub rounds: usize,
    /// Lloyd iterations allowed inside each seed pass.
    pub max_inner_iter: usize,
    /// Seed pass convergence tolerance (summed squared centroid shift).
    pub tol: f64,
    /// k-means++ restarts when the seed pass has no warm start.
    pub n_init: usize,
    /// Random seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Stop once balanced centers move at most this far between rounds.
    pub early_stop: Option<f64>,
}

impl Default for EqualSizeConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            max_inner_iter: 10,
            tol: 1e-4,
            n_init: 10,
            seed: None,
            early_stop: None,
        }
    }
}

/// Equal-size k-means clusterer.
#[derive(Debug, Clone)]
pub struct EqualSizeKmeans {
    k: usize,
    config: EqualSizeConfig,
    initial_centers: Option<CenterSet>,
}

/// Output of [`EqualSizeKmeans::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    /// The clustered points.
    pub points: PointSet,
    /// Balanced label per point.
    pub assignment: Assignment,
    /// Mean of each cluster's balanced members.
    pub centers: CenterSet,
    /// Seed model from the last round.
    pub model: SeedModel,
    /// Points each cluster received in the round-robin phase.
    pub quota: usize,
    /// Points placed by nearest center after the round-robin phase.
    pub remainder: usize,
    /// Rounds actually run (less than configured only with early stop).
    pub rounds_run: usize,
    /// Fewer distinct points than clusters; some centers coincide.
    pub degenerate: bool,
}

impl ClusterResult {
    /// Balanced labels.
    pub fn labels(&self) -> &[usize] {
        self.assignment.labels()
    }

    /// Points per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.assignment.sizes()
    }

    /// Indices of the points in `cluster`.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.assignment.members(cluster)
    }

    /// Each point paired with its label.
    pub fn labeled_points(&self) -> impl Iterator<Item = (ArrayView1<'_, f64>, usize)> + '_ {
        self.assignment
            .labels()
            .iter()
            .enumerate()
            .map(move |(i, &l)| (self.points.row(i), l))
    }

    /// Within-cluster sum of squares of the balanced labelling.
    pub fn wcss(&self) -> Result<f64> {
        metrics::wcss(&self.points, self.assignment.labels(), &self.centers)
    }
}

impl EqualSizeKmeans {
    /// Create a clusterer for `k` equal-size groups with default options.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            config: EqualSizeConfig::default(),
            initial_centers: None,
        }
    }

    /// Replace all options at once.
    pub fn with_config(mut self, config: EqualSizeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of outer rounds.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.config.rounds = rounds;
        self
    }

    /// Set the Lloyd iteration cap of each seed pass.
    pub fn with_max_inner_iter(mut self, max_inner_iter: usize) -> Self {
        self.config.max_inner_iter = max_inner_iter;
        self
    }

    /// Set the seed pass convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Set the number of k-means++ restarts for a cold seed pass.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.config.n_init = n_init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Stop once the balanced centers move by at most `eps` in a round.
    pub fn with_early_stop(mut self, eps: f64) -> Self {
        self.config.early_stop = Some(eps);
        self
    }

    /// Warm-start the first round from these centers instead of k-means++.
    pub fn with_initial_centers(mut self, centers: CenterSet) -> Self {
        self.initial_centers = Some(centers);
        self
    }

    /// Current options.
    pub fn config(&self) -> &EqualSizeConfig {
        &self.config
    }

    /// Built-in seed clusterer configured from the options.
    pub fn seeder(&self) -> Kmeans {
        let kmeans = Kmeans::new(self.k)
            .with_max_iter(self.config.max_inner_iter)
            .with_tol(self.config.tol)
            .with_n_init(self.config.n_init);
        match self.config.seed {
            Some(s) => kmeans.with_seed(s),
            None => kmeans,
        }
    }

    /// Cluster raw rows.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<ClusterResult> {
        let points = PointSet::new(data)?;
        self.fit_points(&points)
    }

    /// Cluster a validated point set with the built-in k-means seed.
    pub fn fit_points(&self, points: &PointSet) -> Result<ClusterResult> {
        self.fit_with(points, &self.seeder())
    }

    /// Cluster a validated point set using any seed backend.
    ///
    /// All options are checked before the first seed call; on error no
    /// clustering work has been done.
    pub fn fit_with<S>(&self, points: &PointSet, seeder: &S) -> Result<ClusterResult>
    where
        S: SeedClusterer + ?Sized,
    {
        self.validate(points)?;

        let n = points.len();
        let k = self.k;
        let distinct = points.distinct_count();
        let degenerate = distinct < k;
        if degenerate {
            warn!(
                distinct,
                k, "fewer distinct points than clusters; centers will coincide"
            );
        }

        let mut warm = self.initial_centers.clone();
        let mut last = None;
        let mut rounds_run = 0;

        for round in 1..=self.config.rounds {
            let model = seeder.fit(points, k, warm.as_ref())?;
            if model.centers.len() != k || model.centers.dim() != points.dim() {
                return Err(Error::Other(format!(
                    "seed clusterer returned {}x{} centers, expected {}x{}",
                    model.centers.len(),
                    model.centers.dim(),
                    k,
                    points.dim()
                )));
            }

            let distances = distance_matrix(points, &model.centers)?;
            let balanced = balance(&distances)?;
            // An empty label keeps the previous round's balanced center.
            let previous = warm.as_ref().unwrap_or(&model.centers);
            let centers = update_centers(points, &balanced.assignment, previous)?;

            let shift = warm.as_ref().map(|prev| prev.max_shift(&centers));
            let sizes = balanced.assignment.sizes();
            debug!(
                round,
                rounds = self.config.rounds,
                n,
                k,
                seed_iterations = model.iterations,
                max_shift = ?shift,
                spread = metrics::size_spread(&sizes),
                "balanced round"
            );

            rounds_run = round;
            let settled = match (self.config.early_stop, shift) {
                (Some(eps), Some(s)) => s <= eps,
                _ => false,
            };

            warm = Some(centers.clone());
            last = Some((model, balanced, centers));

            if settled {
                debug!(round, "centers settled; stopping early");
                break;
            }
        }

        let (model, balanced, centers) = last.ok_or(Error::InvalidParameter {
            name: "rounds",
            message: "must be at least 1",
        })?;

        Ok(ClusterResult {
            points: points.clone(),
            assignment: balanced.assignment,
            centers,
            model,
            quota: balanced.quota,
            remainder: balanced.remainder,
            rounds_run,
            degenerate,
        })
    }

    fn validate(&self, points: &PointSet) -> Result<()> {
        let n = points.len();
        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.config.rounds == 0 {
            return Err(Error::InvalidParameter {
                name: "rounds",
                message: "must be at least 1",
            });
        }
        if self.config.max_inner_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_inner_iter",
                message: "must be at least 1",
            });
        }
        if self.config.n_init == 0 {
            return Err(Error::InvalidParameter {
                name: "n_init",
                message: "must be at least 1",
            });
        }
        if !(self.config.tol.is_finite() && self.config.tol >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be finite and non-negative",
            });
        }
        if let Some(eps) = self.config.early_stop {
            if !(eps.is_finite() && eps >= 0.0) {
                return Err(Error::InvalidParameter {
                    name: "early_stop",
                    message: "must be finite and non-negative",
                });
            }
        }
        if let Some(init) = &self.initial_centers {
            if init.dim() != points.dim() {
                return Err(Error::DimensionMismatch {
                    expected: points.dim(),
                    found: init.dim(),
                });
            }
            if init.len() != self.k {
                return Err(Error::InvalidClusterCount {
                    requested: init.len(),
                    n_items: self.k,
                });
            }
        }
        Ok(())
    }
}

impl Clustering for EqualSizeKmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data)
            .map(|result| result.assignment.into_labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
