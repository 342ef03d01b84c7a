//! Validated point and center storage.
//!
//! Both types wrap a row-major `Array2<f64>` (one row per vector). A
//! [`PointSet`] is checked once on construction (non-empty, rectangular,
//! finite) so every later stage can index it without re-validating.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// An ordered, immutable set of `n` points of dimension `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    data: Array2<f64>,
}

impl PointSet {
    /// Build a point set from rows, rejecting empty, ragged or non-finite input.
    pub fn new(rows: &[Vec<f64>]) -> Result<Self> {
        let data = rows_to_array(rows)?;
        Self::from_array(data)
    }

    /// Wrap an existing `n × d` array.
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

    /// Number of points.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Dimension of every point.
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// Point `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    /// Borrow the underlying array.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Number of pairwise-distinct points (exact comparison).
    pub fn distinct_count(&self) -> usize {
        let mut keys: Vec<Vec<u64>> = self
            .data
            .rows()
            .into_iter()
            .map(|r| r.iter().map(|v| canonical_bits(*v)).collect())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys.len()
    }
}

/// An ordered set of `k` centroids of dimension `d`.
///
/// Stages never edit a center set; they produce a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterSet {
    data: Array2<f64>,
}

impl CenterSet {
    /// Build a center set from rows.
    pub fn new(rows: &[Vec<f64>]) -> Result<Self> {
        let data = rows_to_array(rows)?;
        Self::from_array(data)
    }

    /// Wrap an existing `k × d` array.
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

    pub(crate) fn from_array_unchecked(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Number of centers.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Dimension of every center.
    pub fn dim(&self) -> usize {
        self.data.ncols()
    }

    /// Center `j`.
    pub fn row(&self, j: usize) -> ArrayView1<'_, f64> {
        self.data.row(j)
    }

    /// Borrow the underlying array.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Centers as plain rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Largest Euclidean distance any center moved relative to `other`.
    ///
    /// Returns `f64::INFINITY` when the two sets have different shapes.
    pub fn max_shift(&self, other: &CenterSet) -> f64 {
        if self.data.dim() != other.data.dim() {
            return f64::INFINITY;
        }
        self.data
            .rows()
            .into_iter()
            .zip(other.data.rows())
            .map(|(a, b)| euclidean(&a, &b))
            .fold(0.0, f64::max)
    }
}

/// Euclidean distance between two equal-length vectors.
#[inline]
pub(crate) fn euclidean(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Squared Euclidean distance between two equal-length vectors.
#[inline]
pub(crate) fn squared_distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

// -0.0 and 0.0 compare equal, so they must hash the same.
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn rows_to_array(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    if rows.is_empty() {
        return Err(Error::EmptyInput);
    }
    let n = rows.len();
    let d = rows[0].len();
    let mut flat: Vec<f64> = Vec::with_capacity(n * d);
    for row in rows {
        if row.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: row.len(),
            });
        }
        flat.extend(row);
    }
    Array2::from_shape_vec((n, d), flat).map_err(|e| Error::Other(e.to_string()))
}
