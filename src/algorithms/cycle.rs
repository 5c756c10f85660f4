// src/algorithms/cycle.rs - Cycle detection over a claimed solution
// Tree location: ./src/algorithms/cycle.rs

//! Cycle detection and solution verification
//!
//! Verification never looks at the whole graph. The claimed nonces are turned
//! into edges and a small adjacency table is built over those edges only; the
//! solution is accepted iff that table describes one simple cycle that uses
//! every edge.

use hashbrown::HashMap;
use thiserror::Error;

use super::{
    graph::{Edge, Node, Partition},
    EdgeGenerator,
};
use crate::consensus::PROOF_SIZE;

/// Reasons a claimed solution is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Number of nonces differs from the proof size
    #[error("wrong cycle length: expected {expected} nonces, got {actual}")]
    WrongLength {
        /// Required number of nonces
        expected: usize,
        /// Number of nonces supplied
        actual: usize,
    },

    /// A nonce is outside the allowed edge range
    #[error("edge too big: nonce {nonce} is not below {limit}")]
    NonceTooBig {
        /// Offending nonce
        nonce: u32,
        /// Exclusive upper bound
        limit: u64,
    },

    /// Nonces are not strictly increasing (also covers duplicates)
    #[error("edges not ascending at position {index}")]
    NotAscending {
        /// Position of the first nonce not greater than its predecessor
        index: usize,
    },

    /// The edges do not form a single simple cycle of the required length
    #[error("edges do not form a single {expected}-cycle")]
    NoCycle {
        /// Required cycle length
        expected: usize,
    },
}

/// Length of the unique simple cycle formed by `edges`, or 0.
///
/// Every node (tagged with its partition) must have degree exactly 2, and a
/// walk alternating between partitions must return to the first edge only
/// after using each edge once.
pub fn find_cycle_length(edges: &[Edge]) -> usize {
    let Some(first) = edges.first() else {
        return 0;
    };

    let mut adjacency: HashMap<Node, Vec<usize>> = HashMap::with_capacity(2 * edges.len());
    for (i, edge) in edges.iter().enumerate() {
        adjacency.entry(edge.u_node()).or_default().push(i);
        adjacency.entry(edge.v_node()).or_default().push(i);
    }

    if adjacency.values().any(|incident| incident.len() != 2) {
        return 0;
    }

    let mut visited = vec![false; edges.len()];
    let mut current = 0;
    let mut node = first.v_node();
    let mut length = 0;

    loop {
        visited[current] = true;
        length += 1;

        let Some(incident) = adjacency.get(&node) else {
            return 0;
        };
        let next = if incident[0] == current {
            incident[1]
        } else {
            incident[0]
        };

        if next == 0 {
            break;
        }
        if visited[next] {
            return 0;
        }

        current = next;
        node = match node.partition {
            Partition::V => edges[next].u_node(),
            Partition::U => edges[next].v_node(),
        };
    }

    if length == edges.len() {
        length
    } else {
        0
    }
}

/// Check that `nonces` is a valid `PROOF_SIZE`-cycle of `generator`, with
/// every nonce strictly below `limit`.
pub fn verify_cycle<G: EdgeGenerator + ?Sized>(
    generator: &G,
    nonces: &[u32],
    limit: u64,
) -> Result<(), VerifyError> {
    if nonces.len() != PROOF_SIZE {
        return Err(VerifyError::WrongLength {
            expected: PROOF_SIZE,
            actual: nonces.len(),
        });
    }

    let mut edges = Vec::with_capacity(nonces.len());
    for (n, &nonce) in nonces.iter().enumerate() {
        if u64::from(nonce) >= limit {
            return Err(VerifyError::NonceTooBig { nonce, limit });
        }
        if n > 0 && nonce <= nonces[n - 1] {
            return Err(VerifyError::NotAscending { index: n });
        }
        edges.push(generator.edge(u64::from(nonce)));
    }

    if find_cycle_length(&edges) != PROOF_SIZE {
        return Err(VerifyError::NoCycle {
            expected: PROOF_SIZE,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(u64, u64)]) -> Vec<Edge> {
        pairs.iter().map(|&(u, v)| Edge::new(u, v)).collect()
    }

    #[test]
    fn test_should_find_cycle() {
        // Figure 1 of the Cuckoo Cycle paper: 8 -> 9 -> 4 -> 13 -> 10 -> 5 -> 8
        let cycle = edges(&[(8, 5), (10, 5), (4, 9), (4, 13), (8, 9), (10, 13)]);
        assert_eq!(find_cycle_length(&cycle), 6);
    }

    #[test]
    fn test_should_not_find_open_path() {
        // 2 -> 5 -> 4 -> 9 -> 8 -> 11 -> 10 never closes
        let path = edges(&[(1, 5), (5, 4), (4, 9), (9, 8), (8, 11), (11, 10)]);
        assert_eq!(find_cycle_length(&path), 0);
    }

    #[test]
    fn test_should_not_find_cycle_not_bipartite() {
        // 2 -> 4 -> 5 -> 2 would need an odd cycle
        let triangle = edges(&[(2, 4), (4, 5), (5, 2)]);
        assert_eq!(find_cycle_length(&triangle), 0);
    }

    #[test]
    fn test_two_disjoint_cycles() {
        // Two 4-cycles: every node has degree 2 but the walk stops after 4 edges
        let twice = edges(&[(0, 0), (1, 0), (1, 1), (0, 1), (5, 5), (6, 5), (6, 6), (5, 6)]);
        assert_eq!(find_cycle_length(&twice), 0);
        assert_eq!(find_cycle_length(&twice[..4]), 4);
    }

    #[test]
    fn test_empty_edge_set() {
        assert_eq!(find_cycle_length(&[]), 0);
    }

    #[test]
    fn test_branching_node() {
        // u0 has degree 3
        let branch = edges(&[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)]);
        assert_eq!(find_cycle_length(&branch), 0);
    }
}
