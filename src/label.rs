use crate::graph::Graph;
use crate::mphf::MphError;
use crate::util::BitSet;

/// Derive the label table `g` for an acyclic graph carrying `n` edges.
///
/// Every component is rooted at its lowest node with label 0; a neighbor `w` reached from `v`
/// gets `(weight(v, w) - g[v] + n) mod n`, so each edge ends up with
/// `(g[v] + g[w]) mod n == weight`. Nodes without edges keep 0.
///
/// An already labeled neighbor that disagrees with the value implied by the edge is reported
/// as [`MphError::InternalInconsistency`]; on a verified forest that never happens.
pub fn label_graph(graph: &Graph, n: u32) -> Result<Vec<u32>, MphError> {
    debug_assert!(n > 0);
    let m = graph.num_nodes() as usize;
    let n64 = n as u64;
    let mut g = vec![0u32; m];
    let mut labeled = BitSet::new(m);
    let mut stack: Vec<u32> = Vec::new();

    for root in 0..m as u32 {
        if !labeled.insert(root as usize) {
            continue;
        }
        g[root as usize] = 0;
        stack.push(root);

        while let Some(v) = stack.pop() {
            let gv = g[v as usize] as u64;
            for &w in graph.neighbors(v) {
                let weight = graph
                    .edge_weight(v, w)
                    .ok_or(MphError::EdgeNotFound { v, w })? as u64;
                let want = ((weight % n64 + n64 - gv) % n64) as u32;
                if labeled.insert(w as usize) {
                    g[w as usize] = want;
                    stack.push(w);
                } else if g[w as usize] != want {
                    return Err(MphError::InternalInconsistency {
                        node: w,
                        expected: want,
                        found: g[w as usize],
                    });
                }
            }
        }
    }
    debug_assert_eq!(labeled.count_ones(), m);
    Ok(g)
}
