use crate::hash::TrialPair;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MphError {
    #[error("duplicate key at rank {rank}")]
    DuplicateKey { rank: u32 },
    #[error("empty key set is not supported")]
    EmptyKeySet,
    #[error("{0} keys do not fit u32 ranks")]
    TooManyKeys(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error(
        "no acyclic graph for {num_keys} keys on {num_nodes} nodes after {attempts} seed attempts"
    )]
    ConstructionFailure {
        attempts: u64,
        num_nodes: u32,
        num_keys: u32,
    },
    #[error("node {node} relabeled: expected {expected}, found {found}")]
    InternalInconsistency { node: u32, expected: u32, found: u32 },
    #[error("no edge between nodes {v} and {w}")]
    EdgeNotFound { v: u32, w: u32 },
    #[error("node {node} outside graph of {num_nodes} nodes")]
    InvalidArgument { node: u32, num_nodes: u32 },
    #[error("label table has {found} entries, evaluator expects {expected}")]
    InvalidState { expected: u32, found: usize },
    #[error("label table describes zero keys")]
    EmptyTable,
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serde(#[from] Box<bincode::ErrorKind>),
}

/// Exported state of a built function: `(m, n, seed, g)`.
///
/// Together with the same trial functions this is everything needed to evaluate the hash;
/// the binary form keeps that field order with fixed-width little-endian integers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    pub num_nodes: u32, // m
    pub num_keys: u32,  // n
    pub seed: u64,      // accepted seed
    pub g: Vec<u32>,    // len == m, values in [0..n)
}

impl LabelTable {
    /// Check that the table can drive an evaluator over `num_nodes` nodes.
    pub fn validate(&self, num_nodes: u32) -> Result<(), MphError> {
        if num_nodes == 0 {
            return Err(MphError::InvalidConfig("num_nodes must be positive"));
        }
        if self.g.len() != num_nodes as usize || self.num_nodes != num_nodes {
            return Err(MphError::InvalidState {
                expected: num_nodes,
                found: self.g.len(),
            });
        }
        if self.num_keys == 0 {
            return Err(MphError::EmptyTable);
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, MphError> {
        Ok(bincode::serialize(self)?)
    }

    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MphError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Order-preserving minimal perfect hash: key -> its rank in the build input.
///
/// Query: f(k) = (g[h1(k, seed) mod m] + g[h2(k, seed) mod m]) mod n
#[derive(Debug, Clone)]
pub struct Opmphf {
    trials: TrialPair,
    table: LabelTable,
}

impl Opmphf {
    pub(crate) fn from_parts(trials: TrialPair, table: LabelTable) -> Self {
        Self { trials, table }
    }

    /// Restore an evaluator for `num_nodes` nodes from an exported `(n, seed, g)`.
    pub fn import(
        num_nodes: u32,
        trials: TrialPair,
        num_keys: u32,
        seed: u64,
        g: Vec<u32>,
    ) -> Result<Self, MphError> {
        Self::from_table(
            trials,
            LabelTable {
                num_nodes,
                num_keys,
                seed,
                g,
            },
        )
    }

    /// Restore an evaluator from a whole [`LabelTable`].
    pub fn from_table(trials: TrialPair, table: LabelTable) -> Result<Self, MphError> {
        table.validate(table.num_nodes)?;
        Ok(Self { trials, table })
    }

    /// `(m, n, seed, g)` of this function.
    pub fn export(&self) -> LabelTable {
        self.table.clone()
    }

    pub fn into_table(self) -> LabelTable {
        self.table
    }

    /// O(1) lookup. Keys outside the build set still land in `[0, n)`.
    #[inline]
    pub fn index(&self, key: &[u8]) -> u64 {
        let (v, w) = self.nodes(key);
        let gv = self.table.g[v as usize] as u64;
        let gw = self.table.g[w as usize] as u64;
        (gv + gw) % self.table.num_keys as u64
    }

    #[inline]
    pub fn index_str(&self, s: &str) -> u64 {
        self.index(s.as_bytes())
    }

    /// Graph endpoints of `key` under the accepted seed.
    #[inline]
    pub fn nodes(&self, key: &[u8]) -> (u32, u32) {
        self.trials
            .nodes(key, self.table.seed, self.table.num_nodes)
    }

    pub fn len(&self) -> usize {
        self.table.num_keys as usize
    }

    pub fn is_empty(&self) -> bool {
        self.table.num_keys == 0
    }

    pub fn num_nodes(&self) -> u32 {
        self.table.num_nodes
    }

    pub fn seed(&self) -> u64 {
        self.table.seed
    }

    pub fn labels(&self) -> &[u32] {
        &self.table.g
    }

    pub fn trials(&self) -> &TrialPair {
        &self.trials
    }
}
