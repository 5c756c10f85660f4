// src/algorithms/graph.rs - Bipartite graph primitives
// Tree location: ./src/algorithms/graph.rs

//! Bipartite graph primitives shared by verification and mining
//!
//! A Cuckoo graph is never materialized for verification: edges are pure
//! functions of `(keys, size)`. The [`Graph`] container below is only used by
//! the reference miner, which needs degree information to trim the graph
//! before searching for cycles.
//!
//! # Version History
//! - 0.1.0: Edge/Node types with partition tagging
//! - 0.1.1: Degree-counting graph with leaf trimming for the reference miner

use hashbrown::HashMap;

use super::EdgeGenerator;

/// Side of the bipartite graph a node belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Left side, endpoints derived from even SipHash inputs
    U,
    /// Right side, endpoints derived from odd SipHash inputs
    V,
}

/// A graph vertex. U and V nodes with the same index are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    /// Partition of the node
    pub partition: Partition,
    /// Index within its partition
    pub index: u64,
}

impl Node {
    /// Node on the U side
    pub fn u(index: u64) -> Self {
        Self {
            partition: Partition::U,
            index,
        }
    }

    /// Node on the V side
    pub fn v(index: u64) -> Self {
        Self {
            partition: Partition::V,
            index,
        }
    }
}

/// A single edge in the bipartite graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Endpoint in the U partition
    pub u: u64,
    /// Endpoint in the V partition
    pub v: u64,
}

impl Edge {
    /// Create a new edge
    pub fn new(u: u64, v: u64) -> Self {
        Self { u, v }
    }

    /// U endpoint as a tagged node
    pub fn u_node(&self) -> Node {
        Node::u(self.u)
    }

    /// V endpoint as a tagged node
    pub fn v_node(&self) -> Node {
        Node::v(self.v)
    }

    /// Rebuild an edge from two adjacent nodes given in either order
    pub fn between(a: Node, b: Node) -> Self {
        match a.partition {
            Partition::U => Self::new(a.index, b.index),
            Partition::V => Self::new(b.index, a.index),
        }
    }
}

/// Explicit edge set with degree counters, used for trimming
#[derive(Debug, Default)]
pub struct Graph {
    /// Edge index (nonce) of every edge, in insertion order
    nonces: Vec<u32>,
    /// Endpoints of every edge
    edges: Vec<Edge>,
    /// Whether the edge survived trimming so far
    alive: Vec<bool>,
    /// Live degree of U nodes
    u_degree: HashMap<u64, u32>,
    /// Live degree of V nodes
    v_degree: HashMap<u64, u32>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph sized for `edges` edges
    pub fn with_capacity(edges: usize) -> Self {
        Self {
            nonces: Vec::with_capacity(edges),
            edges: Vec::with_capacity(edges),
            alive: Vec::with_capacity(edges),
            u_degree: HashMap::with_capacity(edges),
            v_degree: HashMap::with_capacity(edges),
        }
    }

    /// Add an edge to the graph
    pub fn add_edge(&mut self, nonce: u32, edge: Edge) {
        self.nonces.push(nonce);
        self.edges.push(edge);
        self.alive.push(true);

        *self.u_degree.entry(edge.u).or_default() += 1;
        *self.v_degree.entry(edge.v).or_default() += 1;
    }

    /// Get the live degree of a U node
    pub fn u_degree(&self, node: u64) -> u32 {
        self.u_degree.get(&node).copied().unwrap_or(0)
    }

    /// Get the live degree of a V node
    pub fn v_degree(&self, node: u64) -> u32 {
        self.v_degree.get(&node).copied().unwrap_or(0)
    }

    /// Number of edges still alive
    pub fn edge_count(&self) -> usize {
        self.alive.iter().filter(|&&alive| alive).count()
    }

    /// Remove edges touching a node of degree below `min_degree`, repeating
    /// until no such edge is left. Returns the number of edges removed.
    pub fn trim(&mut self, min_degree: u32) -> usize {
        let mut removed_count = 0;
        let mut changed = true;

        while changed {
            changed = false;

            for i in 0..self.edges.len() {
                if !self.alive[i] {
                    continue;
                }

                let edge = self.edges[i];
                if self.u_degree(edge.u) < min_degree || self.v_degree(edge.v) < min_degree {
                    self.remove_edge(i);
                    removed_count += 1;
                    changed = true;
                }
            }
        }

        removed_count
    }

    fn remove_edge(&mut self, idx: usize) {
        let edge = self.edges[idx];
        self.alive[idx] = false;

        if let Some(degree) = self.u_degree.get_mut(&edge.u) {
            *degree -= 1;
            if *degree == 0 {
                self.u_degree.remove(&edge.u);
            }
        }

        if let Some(degree) = self.v_degree.get_mut(&edge.v) {
            *degree -= 1;
            if *degree == 0 {
                self.v_degree.remove(&edge.v);
            }
        }
    }

    /// Live edges with their nonces, in insertion order
    pub fn live_edges(&self) -> impl Iterator<Item = (u32, Edge)> + '_ {
        self.nonces
            .iter()
            .zip(&self.edges)
            .zip(&self.alive)
            .filter(|&(_, &alive)| alive)
            .map(|((&nonce, &edge), _)| (nonce, edge))
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            edge_count: self.edge_count(),
            u_node_count: self.u_degree.len(),
            v_node_count: self.v_degree.len(),
        }
    }
}

/// Graph statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of live edges
    pub edge_count: usize,
    /// Number of U nodes with at least one live edge
    pub u_node_count: usize,
    /// Number of V nodes with at least one live edge
    pub v_node_count: usize,
}

/// Materialize every edge with a nonce below `limit`
pub fn generate_graph<G: EdgeGenerator + ?Sized>(generator: &G, limit: u32) -> Graph {
    let mut graph = Graph::with_capacity(limit as usize);

    for nonce in 0..limit {
        graph.add_edge(nonce, generator.edge(u64::from(nonce)));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_tagging() {
        assert_ne!(Node::u(5), Node::v(5));
        assert_eq!(Node::u(5), Edge::new(5, 9).u_node());
        assert_eq!(Node::v(9), Edge::new(5, 9).v_node());
    }

    #[test]
    fn test_edge_between() {
        let edge = Edge::new(3, 7);
        assert_eq!(Edge::between(Node::u(3), Node::v(7)), edge);
        assert_eq!(Edge::between(Node::v(7), Node::u(3)), edge);
    }

    #[test]
    fn test_graph_degrees() {
        let mut graph = Graph::new();
        graph.add_edge(0, Edge::new(0, 0));
        graph.add_edge(1, Edge::new(0, 1));

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.u_degree(0), 2);
        assert_eq!(graph.v_degree(0), 1);
        assert_eq!(graph.v_degree(1), 1);
        assert_eq!(graph.u_degree(7), 0);
    }

    #[test]
    fn test_graph_trimming_keeps_cycle() {
        let mut graph = Graph::new();

        // 4-cycle u0-v0-u1-v1-u0
        graph.add_edge(0, Edge::new(0, 0));
        graph.add_edge(1, Edge::new(1, 0));
        graph.add_edge(2, Edge::new(1, 1));
        graph.add_edge(3, Edge::new(0, 1));
        // Dangling path hanging off u0
        graph.add_edge(4, Edge::new(0, 5));
        graph.add_edge(5, Edge::new(6, 5));

        let removed = graph.trim(2);
        assert_eq!(removed, 2);

        let nonces: Vec<u32> = graph.live_edges().map(|(nonce, _)| nonce).collect();
        assert_eq!(nonces, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_graph_stats() {
        let mut graph = Graph::new();
        graph.add_edge(0, Edge::new(0, 0));
        graph.add_edge(1, Edge::new(0, 1));

        let stats = graph.stats();
        assert_eq!(stats.edge_count, 2);
        assert_eq!(stats.u_node_count, 1);
        assert_eq!(stats.v_node_count, 2);
    }
}
