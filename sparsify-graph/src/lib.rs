//! Edge-list ingestion implementing [`EdgeSource`].
//!
//! Reads whitespace-separated edge lists such as the SNAP datasets: one edge
//! per line, two node labels per edge, `#` or `%` comment lines. Labels are
//! mapped to dense ids `1..=n` in first-appearance order.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use sparsify_core::{Edge, EdgeSource};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while reading an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// The edge list file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Reading from the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A non-comment line did not hold two node labels.
    #[error("line {line} is not an edge: `{content}`")]
    MalformedLine {
        /// One-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },
    /// The input held no nodes.
    #[error("edge list contains no nodes")]
    EmptyInput,
}

/// Counts describing a loaded edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    /// Distinct node labels.
    pub nodes: usize,
    /// Edges kept, parallel edges included.
    pub edges: usize,
    /// Self-loops discarded while reading.
    pub self_loops_dropped: usize,
}

/// Undirected graph loaded from a text edge list.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use sparsify_core::EdgeSource;
/// use sparsify_graph::EdgeListGraph;
///
/// let input = "# FromNodeId ToNodeId\n10 20\n20 30\n30 30\n";
/// let graph = EdgeListGraph::try_from_reader("demo", Cursor::new(input))?;
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.label(1), Some("10"));
/// assert_eq!(graph.stats().self_loops_dropped, 1);
/// # Ok::<(), sparsify_graph::EdgeListError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EdgeListGraph {
    name: String,
    labels: Vec<String>,
    ids: HashMap<String, usize>,
    edges: Vec<Edge>,
    self_loops_dropped: usize,
}

impl EdgeListGraph {
    /// Reads an edge list from `reader`.
    ///
    /// Tokens after the second on a line (weights, timestamps) are ignored.
    /// A self-loop registers its node but contributes no edge.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] when reading fails,
    /// [`EdgeListError::MalformedLine`] for a line with fewer than two
    /// tokens, and [`EdgeListError::EmptyInput`] when no node was read.
    pub fn try_from_reader(
        name: impl Into<String>,
        reader: impl BufRead,
    ) -> Result<Self, EdgeListError> {
        let mut graph = Self {
            name: name.into(),
            labels: Vec::new(),
            ids: HashMap::new(),
            edges: Vec::new(),
            self_loops_dropped: 0,
        };

        for (offset, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let (Some(source), Some(target)) = (tokens.next(), tokens.next()) else {
                return Err(EdgeListError::MalformedLine {
                    line: offset + 1,
                    content: trimmed.to_owned(),
                });
            };
            let source = graph.intern(source);
            let target = graph.intern(target);
            if source == target {
                graph.self_loops_dropped += 1;
            } else {
                graph.edges.push(Edge::new(source, target));
            }
        }

        if graph.labels.is_empty() {
            return Err(EdgeListError::EmptyInput);
        }
        Ok(graph)
    }

    /// Opens and reads the edge list at `path`.
    ///
    /// The graph is named `name`, or the file stem when `name` is `None`.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Open`] when the file cannot be opened and the
    /// errors of [`Self::try_from_reader`] otherwise.
    #[instrument(name = "graph.load", err, skip(path), fields(path = %path.as_ref().display()))]
    pub fn try_from_path(
        path: impl AsRef<Path>,
        name: Option<&str>,
    ) -> Result<Self, EdgeListError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EdgeListError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = Self::try_from_reader(derive_graph_name(path, name), BufReader::new(file))?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            self_loops_dropped = graph.self_loops_dropped,
            "edge list loaded"
        );
        Ok(graph)
    }

    /// Returns the original label of node `id`.
    #[must_use]
    pub fn label(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|slot| self.labels.get(slot))
            .map(String::as_str)
    }

    /// Returns the id assigned to `label`.
    #[must_use]
    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Returns every label, indexed by `id - 1`.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns node, edge and dropped self-loop counts.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.labels.len(),
            edges: self.edges.len(),
            self_loops_dropped: self.self_loops_dropped,
        }
    }

    fn intern(&mut self, label: &str) -> usize {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        self.labels.push(label.to_owned());
        let id = self.labels.len();
        self.ids.insert(label.to_owned(), id);
        id
    }
}

impl EdgeSource for EdgeListGraph {
    fn name(&self) -> &str {
        &self.name
    }

    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Picks `override_name` when given, else the file stem of `path`.
#[must_use]
pub fn derive_graph_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map_or_else(|| "graph".to_owned(), ToOwned::to_owned)
}
