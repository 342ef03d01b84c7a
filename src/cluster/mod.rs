//! Equal-size clustering.
//!
//! Plain k-means minimizes within-cluster variance and says nothing about
//! cluster sizes: a dense neighbourhood can swallow half the points while a
//! sparse one gets three. When each cluster becomes a unit of work (a delivery
//! route, a shard, a batch) that imbalance is the problem.
//!
//! [`EqualSizeKmeans`] keeps k-means' geometry but re-labels the points so
//! every cluster gets the same quota:
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌─────────┐   ┌────────┐
//! │ k-means  │──▶│ distances │──▶│ balance │──▶│ update │──┐
//! └──────────┘   └───────────┘   └─────────┘   └────────┘  │
//!      ▲                 warm start                        │
//!      └───────────────────────────────────────────────────┘
//! ```
//!
//! With `n` points and `k` clusters each cluster gets exactly `n div k`
//! points from the round-robin phase. The `n mod k` leftovers go to their
//! nearest center without a size limit, so final sizes can differ by more
//! than one when several leftovers prefer the same cluster.
//!
//! ## Swapping the seed
//!
//! The seed stage is behind [`SeedClusterer`]. [`Kmeans`] is the built-in
//! backend; [`EqualSizeKmeans::fit_with`] accepts any other.
//!
//! ## Usage
//!
//! ```rust
//! use equisize::cluster::{Clustering, EqualSizeKmeans};
//!
//! let data: Vec<Vec<f64>> = (0..7).map(|i| vec![i as f64, 0.0]).collect();
//!
//! let labels = EqualSizeKmeans::new(3)
//!     .with_seed(7)
//!     .fit_predict(&data)
//!     .unwrap();
//!
//! let mut sizes = equisize::metrics::cluster_sizes(&labels, 3);
//! sizes.sort();
//! assert_eq!(sizes, vec![2, 2, 3]);
//! ```

mod balance;
mod centers;
mod distance;
mod equal_size;
mod kmeans;
mod traits;

pub use balance::{
    balance, nearest_center, Assignment, BalancedAssignment, RoundRobin, UnassignedPool,
};
pub use centers::update_centers;
pub use distance::{distance_matrix, DistanceMatrix};
pub use equal_size::{ClusterResult, EqualSizeConfig, EqualSizeKmeans};
pub use kmeans::Kmeans;
pub use traits::{Clustering, SeedClusterer, SeedModel};
