//! Balance and compactness measures for a labelling.
//!
//! | Function | Meaning | Best |
//! |----------|---------|------|
//! | [`cluster_sizes`] | points per label | all equal |
//! | [`size_spread`] | largest minus smallest cluster | 0 |
//! | [`wcss`] | within-cluster sum of squares | lower |
//!
//! Balancing trades some WCSS for a smaller size spread; comparing the two
//! against the unconstrained k-means labels shows what that trade cost.
//!
//! # Example
//!
//! ```rust
//! use equisize::metrics::{cluster_sizes, size_spread};
//!
//! let labels = [0, 1, 2, 0, 1, 2, 1];
//! let sizes = cluster_sizes(&labels, 3);
//! assert_eq!(sizes, vec![2, 3, 2]);
//! assert_eq!(size_spread(&sizes), 1);
//! ```

use crate::error::{Error, Result};
use crate::points::{squared_distance, CenterSet, PointSet};

/// Count of points per label in `0..k`. Labels `>= k` are ignored.
pub fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &l in labels {
        if let Some(s) = sizes.get_mut(l) {
            *s += 1;
        }
    }
    sizes
}

/// Difference between the largest and smallest cluster.
pub fn size_spread(sizes: &[usize]) -> usize {
    let max = sizes.iter().copied().max().unwrap_or(0);
    let min = sizes.iter().copied().min().unwrap_or(0);
    max - min
}

/// Within-cluster sum of squared distances to each label's center.
pub fn wcss(points: &PointSet, labels: &[usize], centers: &CenterSet) -> Result<f64> {
    if labels.len() != points.len() {
        return Err(Error::DimensionMismatch {
            expected: points.len(),
            found: labels.len(),
        });
    }
    if centers.dim() != points.dim() {
        return Err(Error::DimensionMismatch {
            expected: points.dim(),
            found: centers.dim(),
        });
    }
    let mut total = 0.0;
    for (i, &l) in labels.iter().enumerate() {
        if l >= centers.len() {
            return Err(Error::InvalidClusterCount {
                requested: l + 1,
                n_items: centers.len(),
            });
        }
        total += squared_distance(&points.row(i), &centers.row(l));
    }
    Ok(total)
}
