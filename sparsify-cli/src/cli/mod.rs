//! Command-line interface for sparsify.
//!
//! Loads a whitespace-separated edge list and runs one of the `components`,
//! `stats` or `subsample` commands against it.

mod commands;

pub use commands::{
    Cli, CliError, Command, ComponentsArgs, Execution, ExecutionSummary, GraphArgs, Outcome,
    Sampler, SubsampleArgs, render_summary, run_cli,
};
