// src/algorithms/cuckoo/solver.rs - Reference cycle finder for Cuckoo graphs
// Tree location: ./src/algorithms/cuckoo/solver.rs

//! Reference miner for Cuckoo graphs
//!
//! Not tuned for speed; used by tests and tooling to produce proofs.
//!
//! # Algorithm Overview
//! 1. **Graph Construction**: every edge with a nonce below the easiness bound
//! 2. **Trimming**: drop edges with a degree-1 endpoint until none is left
//! 3. **Cycle Search**: path-reversal forest over the surviving edges; an edge
//!    whose endpoints already share a root closes a cycle
//! 4. **Recovery**: map the cycle's edges back to their nonces

use hashbrown::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::Cuckoo;
use crate::algorithms::graph::{generate_graph, Edge, Graph, Node};
use crate::consensus::PROOF_SIZE;
use crate::pow::Proof;

/// Default bound on forest path length
pub const DEFAULT_MAX_PATH_LEN: usize = 8192;

/// Errors that can occur while searching for cycles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Easiness must be a percentage in 1..=100
    #[error("invalid easiness {0}, expected 1..=100")]
    InvalidEasiness(u64),

    /// Cycle length must be even and non-zero in a bipartite graph
    #[error("invalid cycle length {0}")]
    InvalidCycleLength(usize),

    /// A forest path grew beyond the configured bound
    #[error("maximum path length {0} exceeded")]
    PathTooLong(usize),
}

/// Reference Cuckoo miner
#[derive(Debug, Clone)]
pub struct Miner {
    easiness: u64,
    proof_size: usize,
    max_path_len: usize,
}

impl Miner {
    /// Create a miner looking for `proof_size`-cycles at `easiness` percent
    pub fn new(easiness: u64, proof_size: usize) -> Result<Self, SolverError> {
        if !(1..=100).contains(&easiness) {
            return Err(SolverError::InvalidEasiness(easiness));
        }
        if proof_size == 0 || proof_size % 2 != 0 {
            return Err(SolverError::InvalidCycleLength(proof_size));
        }

        Ok(Self {
            easiness,
            proof_size,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        })
    }

    /// Override the forest path bound
    pub fn with_max_path_len(mut self, max_path_len: usize) -> Self {
        self.max_path_len = max_path_len;
        self
    }

    /// Easiness percentage used to bound nonces
    pub fn easiness(&self) -> u64 {
        self.easiness
    }

    /// All `proof_size`-cycles found in the graph, each as sorted nonces
    pub fn find_cycles(&self, cuckoo: &Cuckoo) -> Result<Vec<Vec<u32>>, SolverError> {
        let limit = u32::try_from(cuckoo.easiness_limit(self.easiness)).unwrap_or(u32::MAX);

        let mut graph = generate_graph(cuckoo, limit);
        let removed = graph.trim(2);
        let stats = graph.stats();
        info!(
            size_shift = cuckoo.size_shift(),
            edges = limit,
            removed,
            remaining = stats.edge_count,
            "graph trimmed"
        );

        let mut forest: HashMap<Node, Node> = HashMap::with_capacity(2 * stats.edge_count);
        let mut solutions = Vec::new();

        for (nonce, edge) in graph.live_edges() {
            let u = edge.u_node();
            let v = edge.v_node();
            let us = self.path(&forest, u)?;
            let vs = self.path(&forest, v)?;

            if us.last() == vs.last() {
                // Same root: walk back to the first common node
                let (mut i, mut j) = (us.len() - 1, vs.len() - 1);
                while i > 0 && j > 0 && us[i - 1] == vs[j - 1] {
                    i -= 1;
                    j -= 1;
                }

                let length = i + j + 1;
                debug!(nonce, length, "cycle closed");
                if length == self.proof_size {
                    if let Some(solution) = self.recover(&graph, edge, &us[..=i], &vs[..=j]) {
                        info!(nonce, "found {}-cycle", self.proof_size);
                        solutions.push(solution);
                    }
                }
            } else if us.len() < vs.len() {
                reverse_path(&mut forest, &us);
                forest.insert(u, v);
            } else {
                reverse_path(&mut forest, &vs);
                forest.insert(v, u);
            }
        }

        Ok(solutions)
    }

    /// First `proof_size`-cycle found, if any
    pub fn first_cycle(&self, cuckoo: &Cuckoo) -> Result<Option<Vec<u32>>, SolverError> {
        Ok(self.find_cycles(cuckoo)?.into_iter().next())
    }

    /// First consensus-sized cycle, packaged as a proof
    pub fn mine(&self, cuckoo: &Cuckoo) -> Result<Option<Proof>, SolverError> {
        if self.proof_size != PROOF_SIZE {
            return Err(SolverError::InvalidCycleLength(self.proof_size));
        }

        Ok(self.first_cycle(cuckoo)?.map(|nonces| {
            let mut proof = Proof::zero(cuckoo.size_shift());
            proof.nonces.copy_from_slice(&nonces);
            proof
        }))
    }

    fn path(&self, forest: &HashMap<Node, Node>, start: Node) -> Result<Vec<Node>, SolverError> {
        let mut path = vec![start];
        let mut node = start;

        while let Some(&next) = forest.get(&node) {
            if path.len() >= self.max_path_len {
                warn!(max = self.max_path_len, "cuckoo path too long");
                return Err(SolverError::PathTooLong(self.max_path_len));
            }
            path.push(next);
            node = next;
        }

        Ok(path)
    }

    /// Nonces of the cycle made of `closing` and the two forest paths
    fn recover(&self, graph: &Graph, closing: Edge, us: &[Node], vs: &[Node]) -> Option<Vec<u32>> {
        let mut cycle: HashSet<Edge> = HashSet::with_capacity(self.proof_size);
        cycle.insert(closing);
        for pair in us.windows(2).chain(vs.windows(2)) {
            cycle.insert(Edge::between(pair[0], pair[1]));
        }

        let nonces: Vec<u32> = graph
            .live_edges()
            .filter(|(_, edge)| cycle.contains(edge))
            .map(|(nonce, _)| nonce)
            .collect();

        // Duplicate edges make the nonce set ambiguous
        (nonces.len() == self.proof_size).then_some(nonces)
    }
}

/// Flip parent links along `path` so its first node becomes the root
fn reverse_path(forest: &mut HashMap<Node, Node>, path: &[Node]) {
    for pair in path.windows(2).rev() {
        forest.insert(pair[1], pair[0]);
    }
}
