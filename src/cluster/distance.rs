//! Point-to-center distance matrix.
//!
//! `D[i][j] = ||point_i - center_j||₂`, computed for every point and every
//! center of the current round. Nothing is cached between rounds.

use crate::error::{Error, Result};
use crate::points::{euclidean, CenterSet, PointSet};
use ndarray::{Array2, ArrayView1};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An `n × k` table of Euclidean distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Array2<f64>,
}

impl DistanceMatrix {
    /// Wrap a precomputed `n × k` table.
    ///
    /// Entries must be finite; the assignment engine compares them with `<`.
    pub fn from_array(data: Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(Error::EmptyInput);
        }
        for ((row, col), v) in data.indexed_iter() {
            if !v.is_finite() {
                return Err(Error::NonFiniteValue { row, col });
            }
        }
        Ok(Self { data })
    }

    /// Number of points (rows).
    pub fn n_points(&self) -> usize {
        self.data.nrows()
    }

    /// Number of centers (columns).
    pub fn n_centers(&self) -> usize {
        self.data.ncols()
    }

    /// Distance from point `i` to center `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j]]
    }

    /// All distances from point `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }
}

/// Build the distance matrix for `points` against `centers`.
pub fn distance_matrix(points: &PointSet, centers: &CenterSet) -> Result<DistanceMatrix> {
    if points.dim() != centers.dim() {
        return Err(Error::DimensionMismatch {
            expected: points.dim(),
            found: centers.dim(),
        });
    }

    let n = points.len();
    let k = centers.len();

    #[cfg(feature = "parallel")]
    let flat: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let point = points.row(i);
            (0..k).map(move |j| euclidean(&point, &centers.row(j)))
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let flat: Vec<f64> = (0..n)
        .flat_map(|i| {
            let point = points.row(i);
            (0..k).map(move |j| euclidean(&point, &centers.row(j)))
        })
        .collect();

    let data = Array2::from_shape_vec((n, k), flat).map_err(|e| Error::Other(e.to_string()))?;
    Ok(DistanceMatrix { data })
}
