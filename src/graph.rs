use crate::mphf::MphError;
use crate::util::BitSet;
use hashbrown::HashMap;
use thiserror::Error;

/// Why an edge was not added.
///
/// `SelfLoop` and `EdgeCollision` only mean "this seed is unusable"; the builder recovers from
/// them by moving on to the next seed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejected {
    #[error("self-loop on node {0}")]
    SelfLoop(u32),
    #[error("edge ({0}, {1}) already present")]
    EdgeCollision(u32, u32),
    #[error("node {node} outside graph of {num_nodes} nodes")]
    OutOfRange { node: u32, num_nodes: u32 },
}

/// Undirected simple graph over `m` nodes whose edges carry a key rank.
///
/// - neighbor lists per node (no duplicates: a second edge on a pair is rejected)
/// - weights keyed by the canonical `(min, max)` pair
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adj: Vec<Vec<u32>>,
    weights: HashMap<(u32, u32), u32>,
}

impl Graph {
    pub fn new(num_nodes: u32) -> Self {
        let mut graph = Self::default();
        graph.reset(num_nodes);
        graph
    }

    /// Drop every edge and resize to `num_nodes` isolated nodes. Allocations are kept.
    pub fn reset(&mut self, num_nodes: u32) {
        let m = num_nodes as usize;
        self.adj.truncate(m);
        for list in &mut self.adj {
            list.clear();
        }
        self.adj.resize_with(m, Vec::new);
        self.weights.clear();
    }

    #[inline]
    pub fn num_nodes(&self) -> u32 {
        self.adj.len() as u32
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.weights.len()
    }

    /// Add `{v, w}` with `weight`.
    ///
    /// `Ok(false)` for a self-loop or an already present pair (adjacency untouched),
    /// `Err(InvalidArgument)` for an endpoint outside `[0, m)`.
    pub fn add_edge(&mut self, v: u32, w: u32, weight: u32) -> Result<bool, MphError> {
        match self.insert_edge(v, w, weight) {
            Ok(()) => Ok(true),
            Err(EdgeRejected::SelfLoop(_) | EdgeRejected::EdgeCollision(..)) => Ok(false),
            Err(EdgeRejected::OutOfRange { node, num_nodes }) => {
                Err(MphError::InvalidArgument { node, num_nodes })
            }
        }
    }

    /// Same as [`Graph::add_edge`] but reports the rejection reason.
    pub fn insert_edge(&mut self, v: u32, w: u32, weight: u32) -> Result<(), EdgeRejected> {
        let num_nodes = self.num_nodes();
        for node in [v, w] {
            if node >= num_nodes {
                return Err(EdgeRejected::OutOfRange { node, num_nodes });
            }
        }
        if v == w {
            return Err(EdgeRejected::SelfLoop(v));
        }
        let pair = canonical(v, w);
        if self.weights.contains_key(&pair) {
            return Err(EdgeRejected::EdgeCollision(pair.0, pair.1));
        }
        self.weights.insert(pair, weight);
        self.adj[v as usize].push(w);
        self.adj[w as usize].push(v);
        Ok(())
    }

    /// Neighbors of `v` in insertion order.
    #[inline]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        &self.adj[v as usize]
    }

    /// Weight of `{v, w}`; `None` when the nodes are not adjacent.
    #[inline]
    pub fn edge_weight(&self, v: u32, w: u32) -> Option<u32> {
        self.weights.get(&canonical(v, w)).copied()
    }

    /// Iterate `(v, w, weight)` with `v < w`, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.weights.iter().map(|(&(v, w), &weight)| (v, w, weight))
    }

    /// `true` when every connected component is a tree.
    ///
    /// Iterative DFS with an explicit `(node, parent)` stack: nodes are marked when pushed,
    /// so meeting an already marked neighbor other than the parent closes a cycle.
    pub fn is_acyclic(&self) -> bool {
        let m = self.adj.len();
        let mut visited = BitSet::new(m);
        let mut stack: Vec<(u32, u32)> = Vec::new();

        for root in 0..m as u32 {
            if !visited.insert(root as usize) {
                continue;
            }
            stack.push((root, NO_PARENT));
            while let Some((v, parent)) = stack.pop() {
                for &w in self.neighbors(v) {
                    if w == parent {
                        continue;
                    }
                    if !visited.insert(w as usize) {
                        return false;
                    }
                    stack.push((w, v));
                }
            }
        }
        debug_assert_eq!(visited.count_ones(), visited.len());
        true
    }
}

/// Node indices are `< m <= u32::MAX`, so this never names a real node.
const NO_PARENT: u32 = u32::MAX;

#[inline]
fn canonical(v: u32, w: u32) -> (u32, u32) {
    if v <= w { (v, w) } else { (w, v) }
}
