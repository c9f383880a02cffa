//! CLI module for the workflow builder service

pub mod serve;

use clap::{Parser, Subcommand};

/// No-code workflow builder for LLM pipelines
#[derive(Parser)]
#[command(name = "genstack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (default mode)
    Serve,
}
