//! Size-constrained greedy assignment.
//!
//! Turns a point-to-center [`DistanceMatrix`] into an [`Assignment`] where
//! every cluster receives the same quota of points.
//!
//! # Phase A: round robin
//!
//! With `q = n div k` and `r = n mod k`, the target cluster cycles
//! `0, 1, …, k-1, 0, …` for exactly `n - r` steps. At each step the
//! still-unassigned point closest to the target is taken:
//!
//! ```text
//! i* = argmin_{i ∈ pool} D[i][target]      (ties → lowest i)
//! ```
//!
//! The target visits every cluster exactly `q` times and each visit consumes
//! one point, so each cluster ends Phase A with exactly `q` points.
//!
//! # Phase B: remainder
//!
//! The `r < k` points left in the pool each join their nearest center
//! (`argmin_j D[i][j]`, ties → lowest j) with no size constraint. Final
//! sizes are therefore `q + (remainder points that chose j)`: when the
//! remainder points all prefer the same cluster, that cluster ends with
//! `q + r` points.
//!
//! # Cost
//!
//! Each Phase A step scans the pool: O(n²) per call in the worst case,
//! O(n·k) for the remainder. This is a greedy approximation to a balanced
//! transportation problem, not an exact solver.

use super::distance::DistanceMatrix;
use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// One cluster label per point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    labels: Vec<usize>,
    k: usize,
}

impl Assignment {
    /// Build from labels, checking every label is `< k`.
    pub fn new(labels: Vec<usize>, k: usize) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= k) {
            return Err(Error::InvalidClusterCount {
                requested: bad + 1,
                n_items: k,
            });
        }
        Ok(Self { labels, k })
    }

    /// Labels indexed by point.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Label of point `i`.
    pub fn label(&self, i: usize) -> usize {
        self.labels[i]
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.k
    }

    /// Points per cluster, indexed by label.
    pub fn sizes(&self) -> Vec<usize> {
        crate::metrics::cluster_sizes(&self.labels, self.k)
    }

    /// Indices of the points labelled `cluster`, in input order.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Consume into the raw label vector.
    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }
}

/// Result of [`balance`]: the assignment plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedAssignment {
    /// Final labels.
    pub assignment: Assignment,
    /// Points each cluster received during round robin (`n div k`).
    pub quota: usize,
    /// Points placed by nearest center afterwards (`n mod k`).
    pub remainder: usize,
    /// Indices of the remainder points, ascending.
    pub remainder_points: Vec<usize>,
}

/// Indices of points not yet assigned, iterated in input order.
#[derive(Debug, Clone, Default)]
pub struct UnassignedPool {
    indices: BTreeSet<usize>,
}

impl UnassignedPool {
    /// Pool containing `0..n`.
    pub fn full(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Number of points still unassigned.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True once every point has been assigned.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Remove and return the pool point closest to center `target`.
    ///
    /// Ties go to the point that comes first in input order.
    fn take_nearest(&mut self, distances: &DistanceMatrix, target: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &i in &self.indices {
            let d = distances.get(i, target);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }
        let (i, _) = best?;
        self.indices.remove(&i);
        Some(i)
    }
}

impl IntoIterator for UnassignedPool {
    type Item = usize;
    type IntoIter = std::collections::btree_set::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

/// Cyclic target counter: `0, 1, …, k-1, 0, 1, …`.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    target: usize,
    k: usize,
}

impl RoundRobin {
    /// Start at cluster 0.
    pub fn new(k: usize) -> Self {
        Self { target: 0, k }
    }
}

impl Iterator for RoundRobin {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.k == 0 {
            return None;
        }
        let current = self.target;
        self.target = (self.target + 1) % self.k;
        Some(current)
    }
}

/// Balance `distances` into equal-quota clusters.
///
/// Fails with [`Error::InvalidClusterCount`] when there are more centers than
/// points, before any point is assigned.
pub fn balance(distances: &DistanceMatrix) -> Result<BalancedAssignment> {
    let n = distances.n_points();
    let k = distances.n_centers();

    if k == 0 || k > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }

    let quota = n / k;
    let remainder = n % k;

    let mut labels = vec![usize::MAX; n];
    let mut pool = UnassignedPool::full(n);

    round_robin(distances, &mut pool, quota, &mut labels);
    debug_assert_eq!(pool.len(), remainder);

    let remainder_points = allocate_remainder(distances, pool, &mut labels);
    debug_assert!(labels.iter().all(|&l| l < k));

    Ok(BalancedAssignment {
        assignment: Assignment { labels, k },
        quota,
        remainder,
        remainder_points,
    })
}

/// Phase A: `quota` full cycles over the clusters, one point per step.
fn round_robin(
    distances: &DistanceMatrix,
    pool: &mut UnassignedPool,
    quota: usize,
    labels: &mut [usize],
) {
    let k = distances.n_centers();
    for target in RoundRobin::new(k).take(quota * k) {
        // The pool holds n - step >= r + 1 points here, never empty.
        if let Some(i) = pool.take_nearest(distances, target) {
            labels[i] = target;
        }
    }
}

/// Phase B: every leftover point goes to its nearest center.
fn allocate_remainder(
    distances: &DistanceMatrix,
    pool: UnassignedPool,
    labels: &mut [usize],
) -> Vec<usize> {
    let mut placed = Vec::with_capacity(pool.len());
    for i in pool {
        labels[i] = nearest_center(distances, i);
        placed.push(i);
    }
    placed
}

/// Closest center for point `i`; ties go to the lowest center index.
pub fn nearest_center(distances: &DistanceMatrix, i: usize) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (j, &d) in distances.row(i).iter().enumerate() {
        if d < best_d {
            best_d = d;
            best = j;
        }
    }
    best
}
