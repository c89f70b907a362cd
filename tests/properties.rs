use std::collections::BTreeSet;

use order_preserving_mph::{Builder, Graph, MphError, label::label_graph};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn builds_are_bijective_and_order_preserving(
        keys in prop::collection::btree_set("[a-z0-9]{1,12}", 1..120),
        ratio in 2u32..5,
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let m = ratio * keys.len() as u32 + 1;
        let f = Builder::new(m).with_max_seed_attempts(10_000).build(&keys).unwrap();

        let ranks: BTreeSet<u64> = keys.iter().map(|k| f.index_str(k)).collect();
        prop_assert_eq!(ranks.len(), keys.len());
        for (rank, key) in keys.iter().enumerate() {
            prop_assert_eq!(f.index_str(key), rank as u64);
        }
        for probe in ["", "not-a-key", "ZZZ"] {
            prop_assert!(f.index_str(probe) < keys.len() as u64);
        }
    }

    #[test]
    fn small_domains_never_build(n in 1usize..60, slack in 0u32..4) {
        let keys: Vec<String> = (0..n).map(|i| format!("k{i}")).collect();
        let m = (n as u32).saturating_sub(slack);
        let err = Builder::new(m).with_max_seed_attempts(64).build(&keys).unwrap_err();
        let is_failure = matches!(err, MphError::ConstructionFailure { .. });
        prop_assert!(is_failure);
    }

    #[test]
    fn labeling_any_random_forest_holds(n in 1u32..200, seed in any::<u64>()) {
        // random recursive tree on n + 1 nodes, edge i hangs node i + 1 below an earlier node
        let mut graph = Graph::new(n + 1);
        let mut state = seed | 1;
        for i in 0..n {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let parent = (state % (i as u64 + 1)) as u32;
            prop_assert!(graph.add_edge(i + 1, parent, (i * 31) % n).unwrap());
        }
        prop_assert!(graph.is_acyclic());

        let g = label_graph(&graph, n).unwrap();
        for (v, w, rank) in graph.edges() {
            prop_assert_eq!((g[v as usize] + g[w as usize]) % n, rank);
        }
    }
}
