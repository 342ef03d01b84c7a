//! Glue between the balancing core and the services around it.
//!
//! The typical job is splitting delivery addresses into equally loaded
//! routes:
//!
//! ```text
//! addresses ──geocode──▶ PointSet ──EqualSizeKmeans──▶ ClusterResult
//!                                                        │
//!                                  ┌─────────────────────┼──────────────┐
//!                                  ▼                     ▼              │
//!                           route per cluster      render with colours  │
//! ```
//!
//! The services themselves are traits ([`Geocoder`], [`Router`],
//! [`Renderer`]); this crate ships no network clients. The functions here
//! only do what the core needs around them: drop rows that failed to
//! geocode, keep clusters the router cannot handle away from it, and pick a
//! colour per cluster.
//!
//! None of these steps feed back into clustering: a cluster that cannot be
//! routed is reported, the clustering result is unchanged.

mod geocode;
mod render;
mod route;

pub use geocode::{geocode_addresses, Geocoded, Geocoder};
pub use render::{render, Palette, Renderer};
pub use route::{route_clusters, ClusterRoute, RouteBounds, Router};
