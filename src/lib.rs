//! # equisize
//!
//! Equal-size k-means: cluster points the way k-means would, then rebalance
//! the labels so every cluster carries the same load.
//!
//! The core ([`cluster`]) is a synchronous, single-threaded loop over owned
//! data; independent calls can run on separate threads. [`pipeline`] holds
//! the thin glue to geocoding, routing and map rendering services, which
//! stay behind traits.
//!
//! ```rust
//! use equisize::EqualSizeKmeans;
//!
//! let data: Vec<Vec<f64>> = (0..12).map(|i| vec![(i % 4) as f64, (i / 4) as f64]).collect();
//! let result = EqualSizeKmeans::new(4).with_seed(1).fit(&data).unwrap();
//! assert_eq!(result.cluster_sizes(), vec![3, 3, 3, 3]);
//! ```
//!
//! The `parallel` feature runs per-point loops on rayon; output is identical.

pub mod cluster;
/// Error types used across `equisize`.
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod points;

#[cfg(test)]
mod scenario_tests;

pub use cluster::{
    Assignment, ClusterResult, Clustering, EqualSizeConfig, EqualSizeKmeans, Kmeans,
    SeedClusterer, SeedModel,
};
pub use error::{Error, Result};
pub use metrics::{cluster_sizes, size_spread, wcss};
pub use points::{CenterSet, PointSet};
