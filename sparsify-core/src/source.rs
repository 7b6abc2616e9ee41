//! Graph views consumed by the connectivity engine.

use crate::incidence::Edge;

/// Immutable view of an undirected graph on nodes `1..=node_count`.
///
/// # Examples
/// ```
/// use sparsify_core::{Edge, EdgeSource};
///
/// struct Triangle([Edge; 3]);
///
/// impl EdgeSource for Triangle {
///     fn name(&self) -> &str { "triangle" }
///     fn node_count(&self) -> usize { 3 }
///     fn edges(&self) -> &[Edge] { &self.0 }
/// }
///
/// let graph = Triangle([Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 1)]);
/// assert_eq!(graph.edge_count(), 3);
/// assert!(!graph.is_empty());
/// ```
pub trait EdgeSource {
    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Returns the number of nodes.
    fn node_count(&self) -> usize;

    /// Returns every edge, parallel edges included.
    fn edges(&self) -> &[Edge];

    /// Returns the number of edges.
    #[must_use]
    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Returns whether the graph has no nodes.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}

/// Owned edge list implementing [`EdgeSource`].
///
/// # Examples
/// ```
/// use sparsify_core::{Edge, EdgeList, EdgeSource};
///
/// let graph = EdgeList::new("pair", 2, vec![Edge::new(1, 2)]);
/// assert_eq!(graph.name(), "pair");
/// assert_eq!(graph.node_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeList {
    name: String,
    node_count: usize,
    edges: Vec<Edge>,
}

impl EdgeList {
    /// Wraps `edges` over nodes `1..=node_count`. Edges are validated when
    /// the graph is run.
    #[must_use]
    pub fn new(name: impl Into<String>, node_count: usize, edges: Vec<Edge>) -> Self {
        Self {
            name: name.into(),
            node_count,
            edges,
        }
    }
}

impl EdgeSource for EdgeList {
    fn name(&self) -> &str {
        &self.name
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }
}
