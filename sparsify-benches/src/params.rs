//! Benchmark parameter types.

use std::fmt;

/// Parameters for a connectivity benchmark run.
#[derive(Clone, Debug)]
pub struct ConnectivityBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Number of planted components.
    pub components: usize,
}

impl fmt::Display for ConnectivityBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.components)
    }
}

/// Parameters for a sketching benchmark run.
#[derive(Clone, Debug)]
pub struct SketchBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Rows per sketch.
    pub rows: usize,
}

impl fmt::Display for SketchBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},rows={}", self.node_count, self.rows)
    }
}
