//! CLI argument parsing for orcasai.
//!
//! Uses clap derive macros for declarative argument definitions. This module
//! defines the command structure; actual implementations are in the
//! `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// OrcasAI: coordinate pods of cooperating AI agents from declarative YAML.
///
/// A pod is a named group of agents defined by one configuration file, driven
/// through a scripted multi-step workflow: discover pods, inspect one, or run
/// one with bound input parameters.
#[derive(Parser, Debug)]
#[command(name = "orcasai")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing pod YAML files.
    #[arg(long, global = true, default_value = "pods")]
    pub pods_dir: PathBuf,

    /// Global tools configuration file.
    #[arg(long, global = true, default_value = "tools.yaml")]
    pub tools_config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for orcasai.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all discovered pods, with per-file errors reported after.
    List,

    /// Show detailed information about a specific pod.
    Info(InfoArgs),

    /// Run a pod: bind inputs, assemble the agent graph, execute it.
    Run(RunArgs),

    /// Prompt-driven loop for listing, inspecting, and running pods.
    Interactive(InteractiveArgs),
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Pod key (definition file stem).
    pub pod: String,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Pod key (definition file stem).
    pub pod: String,

    /// Shorthand for `--input topic VALUE`.
    #[arg(long)]
    pub topic: Option<String>,

    /// Shorthand for `--input project VALUE`.
    #[arg(long)]
    pub project: Option<String>,

    /// Input key-value pair. Can be used multiple times.
    #[arg(long = "input", num_args = 2, value_names = ["KEY", "VALUE"], action = ArgAction::Append)]
    pub inputs: Vec<String>,

    /// Command template invoked once per task by the subprocess runtime.
    ///
    /// Placeholders: {pod} {task} {role} {goal} {backstory} {description}
    /// {expected_output} {context} {model} {base_url}
    #[arg(long)]
    pub runner_cmd: Option<String>,

    /// Print the execution outcome as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct InteractiveArgs {
    /// Command template used when running pods interactively.
    #[arg(long)]
    pub runner_cmd: Option<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
