use crate::graph::Graph;
use crate::hash::TrialPair;
use crate::label::label_graph;
use crate::mphf::{LabelTable, MphError, Opmphf};
use ahash::AHashSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Build parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Graph nodes `m`. Must exceed the key count; around `2n` or more seeds succeed quickly.
    pub num_nodes: u32,
    /// Seeds `0..max_seed_attempts` are tried in order before giving up.
    pub max_seed_attempts: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            num_nodes: 0,
            max_seed_attempts: 4096,
        }
    }
}

pub struct Builder {
    cfg: BuildConfig,
    trials: TrialPair,
}

impl Builder {
    pub fn new(num_nodes: u32) -> Self {
        Self {
            cfg: BuildConfig {
                num_nodes,
                ..Default::default()
            },
            trials: TrialPair::default(),
        }
    }

    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_max_seed_attempts(mut self, attempts: u64) -> Self {
        self.cfg.max_seed_attempts = attempts;
        self
    }

    pub fn with_trials(mut self, trials: TrialPair) -> Self {
        self.trials = trials;
        self
    }

    /// Build from **unique** keys; `hash(keys[i]) == i` afterwards.
    pub fn build<K, I>(self, keys: I) -> Result<Opmphf, MphError>
    where
        K: AsRef<[u8]>,
        I: IntoIterator<Item = K>,
    {
        let m = self.cfg.num_nodes;

        // Collect and verify true uniqueness (ranks are input positions).
        let mut uniq = Vec::<Vec<u8>>::new();
        let mut seen = AHashSet::<Vec<u8>>::new();
        for k in keys {
            let v = k.as_ref().to_vec();
            if !seen.insert(v.clone()) {
                return Err(MphError::DuplicateKey {
                    rank: uniq.len() as u32,
                });
            }
            uniq.push(v);
        }
        let n = uniq.len();
        if n == 0 {
            return Err(MphError::EmptyKeySet);
        }
        let n = u32::try_from(n).map_err(|_| MphError::TooManyKeys(n))?;

        let failure = MphError::ConstructionFailure {
            attempts: self.cfg.max_seed_attempts,
            num_nodes: m,
            num_keys: n,
        };
        if m <= n {
            // A forest on m nodes carries at most m - 1 edges; this also covers m == 0.
            warn!(num_nodes = m, num_keys = n, "node domain too small for an acyclic graph");
            return Err(failure);
        }

        info!(
            num_nodes = m,
            num_keys = n,
            max_seed_attempts = self.cfg.max_seed_attempts,
            "searching for an acyclic seed"
        );

        let Some((seed, graph)) = search(&uniq, &self.trials, m, self.cfg.max_seed_attempts)
        else {
            warn!(
                num_nodes = m,
                num_keys = n,
                attempts = self.cfg.max_seed_attempts,
                "seed budget exhausted"
            );
            return Err(failure);
        };
        info!(seed, "accepted seed");

        let g = label_graph(&graph, n)?;
        Ok(Opmphf::from_parts(
            self.trials,
            LabelTable {
                num_nodes: m,
                num_keys: n,
                seed,
                g,
            },
        ))
    }
}

/// Find the lowest seed whose graph is a forest with one edge per key.
#[cfg(not(feature = "parallel"))]
fn search(keys: &[Vec<u8>], trials: &TrialPair, m: u32, attempts: u64) -> Option<(u64, Graph)> {
    let mut graph = Graph::new(m);
    let seed = (0..attempts).find(|&seed| try_seed(&mut graph, keys, trials, seed))?;
    Some((seed, graph))
}

/// Find the lowest seed whose graph is a forest with one edge per key.
///
/// Seeds are spread over the rayon pool, one graph per worker; `find_map_first` keeps the
/// answer identical to the sequential scan.
#[cfg(feature = "parallel")]
fn search(keys: &[Vec<u8>], trials: &TrialPair, m: u32, attempts: u64) -> Option<(u64, Graph)> {
    use rayon::prelude::*;

    let seed = (0..attempts)
        .into_par_iter()
        .map_init(
            || Graph::new(m),
            |graph, seed| try_seed(graph, keys, trials, seed).then_some(seed),
        )
        .find_map_first(|accepted| accepted)?;

    let mut graph = Graph::new(m);
    let rebuilt = try_seed(&mut graph, keys, trials, seed);
    debug_assert!(rebuilt);
    Some((seed, graph))
}

/// One attempt: rebuild the graph for `seed`, abandoning it on the first rejected key.
fn try_seed(graph: &mut Graph, keys: &[Vec<u8>], trials: &TrialPair, seed: u64) -> bool {
    let m = graph.num_nodes();
    graph.reset(m);
    for (rank, key) in keys.iter().enumerate() {
        let (v, w) = trials.nodes(key, seed, m);
        if let Err(reason) = graph.insert_edge(v, w, rank as u32) {
            debug!(seed, rank, %reason, "seed abandoned");
            return false;
        }
    }
    if graph.num_edges() != keys.len() {
        return false;
    }
    let acyclic = graph.is_acyclic();
    if !acyclic {
        debug!(seed, "seed abandoned: cycle");
    }
    acyclic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_nodes_is_a_construction_failure() {
        let err = Builder::new(0).build(["a", "b"]).unwrap_err();
        assert!(matches!(
            err,
            MphError::ConstructionFailure { num_nodes: 0, num_keys: 2, .. }
        ));
    }

    #[test]
    fn rejects_empty_input() {
        let err = Builder::new(8).build(Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, MphError::EmptyKeySet));
    }

    #[test]
    fn rejects_duplicates_with_rank() {
        let err = Builder::new(16).build(["x", "y", "x"]).unwrap_err();
        assert!(matches!(err, MphError::DuplicateKey { rank: 2 }));
    }

    #[test]
    fn too_small_domain_fails_without_search() {
        let err = Builder::new(3)
            .with_max_seed_attempts(u64::MAX)
            .build(["a", "b", "c"])
            .unwrap_err();
        assert!(matches!(
            err,
            MphError::ConstructionFailure { num_nodes: 3, num_keys: 3, .. }
        ));
    }

    #[test]
    fn single_key_builds() {
        let f = Builder::new(4).build(["only"]).unwrap();
        assert_eq!(f.index_str("only"), 0);
        assert_eq!(f.labels().len(), 4);
    }

    #[test]
    fn try_seed_abandons_on_self_loop() {
        let trials = TrialPair::new(
            |_: &[u8], _: u64| -> i64 { 2 },
            |_: &[u8], _: u64| -> i64 { -3 },
        );
        let keys = vec![b"k".to_vec()];
        let mut graph = Graph::new(5);
        // -3 mod 5 == 2
        assert!(!try_seed(&mut graph, &keys, &trials, 0));
        assert_eq!(graph.num_edges(), 0);
    }
}
