//! order_preserving_mph — order-preserving minimal perfect hash over an acyclic random graph.
//!
//! - Build once on an ordered list of **unique** keys (bytes/str).
//! - O(1) lookups: `keys[i]` -> `i`, for every key of the build set.
//! - Each key is an edge between two trial-hash nodes; a seed is accepted once the graph is a
//!   forest, then node labels are propagated so that `(g[v] + g[w]) mod n` is the edge's rank.
//! - The exported `(m, n, seed, g)` table restores the function without searching again.

mod builder;
pub mod graph;
mod hash;
pub mod label;
mod mphf;
mod util;

pub use builder::{BuildConfig, Builder};
pub use graph::{EdgeRejected, Graph};
pub use hash::{DigestTrial, TrialHash, TrialPair, WyTrial, Xxh3Trial, map_to_node};
pub use mphf::{LabelTable, MphError, Opmphf};
