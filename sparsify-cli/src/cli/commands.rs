//! Command implementations and argument parsing for the sparsify CLI.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sparsify_core::{
    Components, ConnectivityBuilder, DEFAULT_SEED, EdgeSource, ExecutionStrategy,
    NestedSubsample, SamplingStrategy, SparsifyError, default_levels, nested_subsample,
};
use sparsify_graph::{EdgeListError, EdgeListGraph, GraphStats};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "sparsify",
    about = "Compute connected components of an edge list from linear sketches."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute the connected components of a graph.
    Components(ComponentsArgs),
    /// Print node, edge and dropped self-loop counts.
    Stats(GraphArgs),
    /// Print edge counts of the nested uniform-hash subsamples.
    Subsample(SubsampleArgs),
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Components(_) => "components",
            Self::Stats(_) => "stats",
            Self::Subsample(_) => "subsample",
        }
    }

    const fn graph_args(&self) -> &GraphArgs {
        match self {
            Self::Components(args) => &args.graph,
            Self::Stats(args) => args,
            Self::Subsample(args) => &args.graph,
        }
    }
}

/// Edge-list input shared by every command.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Path to a whitespace-separated edge list, one edge per line.
    pub path: PathBuf,

    /// Override name for the graph (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Options accepted by the `components` command.
#[derive(Debug, Args, Clone)]
pub struct ComponentsArgs {
    /// Graph to analyse.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// How each supernode samples an outgoing edge.
    #[arg(long, value_enum, default_value_t = Sampler::Exact)]
    pub sampler: Sampler,

    /// How sampling within a round is scheduled.
    #[arg(long, value_enum, default_value_t = Execution::Auto)]
    pub execution: Execution,

    /// Base seed for every random choice.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum number of merge rounds (defaults to `ceil(log2 n)`).
    #[arg(long = "round-budget")]
    pub round_budget: Option<usize>,

    /// Rows per L0 sketch (defaults to `ceil(log2 n) + 2`).
    #[arg(long = "sketch-rows")]
    pub sketch_rows: Option<usize>,
}

/// Options accepted by the `subsample` command.
#[derive(Debug, Args, Clone)]
pub struct SubsampleArgs {
    /// Graph to subsample.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Number of nested levels (defaults to `2 * ceil(log2 n)`).
    #[arg(long)]
    pub levels: Option<usize>,

    /// Seed for the per-level hash bits.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Sampler choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sampler {
    /// Sum incidence vectors and pick a uniform nonzero coordinate.
    Exact,
    /// Sum L0 sketches and recover a surviving coordinate.
    Sketch,
}

impl From<Sampler> for SamplingStrategy {
    fn from(value: Sampler) -> Self {
        match value {
            Sampler::Exact => Self::Exact,
            Sampler::Sketch => Self::Sketch,
        }
    }
}

/// Execution choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Execution {
    /// Parallel when the core was built with Rayon support.
    Auto,
    /// Sample on the calling thread.
    Sequential,
    /// Sample on the Rayon pool.
    Parallel,
}

impl From<Execution> for ExecutionStrategy {
    fn from(value: Execution) -> Self {
        match value {
            Execution::Auto => Self::Auto,
            Execution::Sequential => Self::Sequential,
            Execution::Parallel => Self::Parallel,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The edge list could not be opened or parsed.
    #[error(transparent)]
    Graph(#[from] EdgeListError),
    /// Core computation failed.
    #[error(transparent)]
    Core(#[from] SparsifyError),
}

/// Command-specific part of an [`ExecutionSummary`].
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Result of the `components` command.
    Components {
        /// Partition computed by the core.
        components: Components,
        /// Original node labels of every block, in block order.
        labelled_blocks: Vec<Vec<String>>,
    },
    /// The `stats` command only reports [`ExecutionSummary::stats`].
    Stats,
    /// Result of the `subsample` command.
    Subsample(NestedSubsample),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the loaded graph.
    pub graph: String,
    /// Counts gathered while loading the graph.
    pub stats: GraphStats,
    /// Command-specific result.
    pub outcome: Outcome,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graph or running the command fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use sparsify_cli::cli::{Cli, Command, GraphArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "a b\nb c\nc c\n")?;
/// let cli = Cli {
///     command: Command::Stats(GraphArgs {
///         path: file.path().to_path_buf(),
///         name: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.stats.nodes, 3);
/// assert_eq!(summary.stats.self_loops_dropped, 1);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    Span::current().record("command", field::display(cli.command.label()));
    execute(&cli.command)
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(path = field::Empty, graph = field::Empty, nodes = field::Empty, edges = field::Empty),
)]
pub(super) fn execute(command: &Command) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    let GraphArgs { path, name } = command.graph_args();
    span.record("path", field::display(path.display()));

    let graph = EdgeListGraph::try_from_path(path, name.as_deref())?;
    let stats = graph.stats();
    span.record("graph", field::display(graph.name()));
    span.record("nodes", stats.nodes);
    span.record("edges", stats.edges);

    let outcome = match command {
        Command::Components(args) => run_components(&graph, args)?,
        Command::Stats(_) => Outcome::Stats,
        Command::Subsample(args) => run_subsample(&graph, args)?,
    };

    info!(
        graph = graph.name(),
        command = command.label(),
        "command completed"
    );
    Ok(ExecutionSummary {
        graph: graph.name().to_owned(),
        stats,
        outcome,
    })
}

fn run_components(graph: &EdgeListGraph, args: &ComponentsArgs) -> Result<Outcome, CliError> {
    let mut builder = ConnectivityBuilder::new()
        .with_sampling_strategy(args.sampler.into())
        .with_execution_strategy(args.execution.into())
        .with_seed(args.seed);
    if let Some(rounds) = args.round_budget {
        builder = builder.with_round_budget(rounds);
    }
    if let Some(rows) = args.sketch_rows {
        builder = builder.with_sketch_rows(rows);
    }

    let components = builder.build()?.run(graph)?;
    let labelled_blocks = components
        .blocks()
        .iter()
        .map(|block| {
            block
                .iter()
                .map(|&node| {
                    graph
                        .label(node)
                        .map_or_else(|| node.to_string(), ToOwned::to_owned)
                })
                .collect()
        })
        .collect();
    Ok(Outcome::Components {
        components,
        labelled_blocks,
    })
}

fn run_subsample(graph: &EdgeListGraph, args: &SubsampleArgs) -> Result<Outcome, CliError> {
    let levels = args
        .levels
        .unwrap_or_else(|| default_levels(graph.node_count()));
    let subsample = nested_subsample(graph.edges(), levels, args.seed)?;
    Ok(Outcome::Subsample(subsample))
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// Components are printed one per line as their index followed by the
/// original node labels.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use sparsify_cli::cli::{ExecutionSummary, Outcome, render_summary};
/// # use sparsify_graph::GraphStats;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     graph: "demo".into(),
///     stats: GraphStats { nodes: 2, edges: 1, self_loops_dropped: 0 },
///     outcome: Outcome::Stats,
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer.into_inner())?,
///     "graph: demo\nnodes: 2\nedges: 1\nself-loops dropped: 0\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "graph: {}", summary.graph)?;
    writeln!(writer, "nodes: {}", summary.stats.nodes)?;
    writeln!(writer, "edges: {}", summary.stats.edges)?;
    writeln!(
        writer,
        "self-loops dropped: {}",
        summary.stats.self_loops_dropped
    )?;

    match &summary.outcome {
        Outcome::Components {
            components,
            labelled_blocks,
        } => {
            writeln!(writer, "components: {}", components.component_count())?;
            writeln!(writer, "rounds: {}", components.round_count())?;
            writeln!(writer, "converged: {}", components.converged())?;
            for (index, labels) in labelled_blocks.iter().enumerate() {
                writeln!(writer, "{index}\t{}", labels.join(" "))?;
            }
        }
        Outcome::Stats => {}
        Outcome::Subsample(subsample) => {
            writeln!(writer, "levels: {}", subsample.levels())?;
            for (offset, size) in subsample.level_sizes().iter().enumerate() {
                writeln!(writer, "level {}\t{size}", offset + 1)?;
            }
        }
    }
    Ok(())
}
