//! Center recomputation from a balanced assignment.

use super::balance::Assignment;
use crate::error::{Error, Result};
use crate::points::{CenterSet, PointSet};
use ndarray::Array2;

/// Mean of each cluster's points.
///
/// A cluster that received no points keeps its center from `previous`.
pub fn update_centers(
    points: &PointSet,
    assignment: &Assignment,
    previous: &CenterSet,
) -> Result<CenterSet> {
    let n = points.len();
    let d = points.dim();
    let k = assignment.n_clusters();

    if assignment.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: assignment.len(),
        });
    }
    if previous.dim() != d {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: previous.dim(),
        });
    }
    if previous.len() != k {
        return Err(Error::InvalidParameter {
            name: "previous",
            message: "number of centers must equal the number of clusters",
        });
    }

    let mut sums = Array2::<f64>::zeros((k, d));
    let mut counts = vec![0usize; k];

    for (i, &c) in assignment.labels().iter().enumerate() {
        let mut row = sums.row_mut(c);
        row += &points.row(i);
        counts[c] += 1;
    }

    for (c, &count) in counts.iter().enumerate() {
        let mut row = sums.row_mut(c);
        if count > 0 {
            row /= count as f64;
        } else {
            row.assign(&previous.row(c));
        }
    }

    Ok(CenterSet::from_array_unchecked(sums))
}
