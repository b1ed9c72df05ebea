//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for vsweep using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// vsweep - chunked vCenter inventory export
#[derive(Parser, Debug)]
#[command(name = "vsweep")]
#[command(version, about, long_about = None)]
#[command(author = "vsweep Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "vsweep.toml", env = "VSWEEP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VSWEEP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export inventory from the configured vCenter servers
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List the exportable units and their timeouts
    Units(commands::units::UnitsArgs),

    /// Merge unit workbooks by hand (e.g. kept parts after a failed merge)
    Merge(commands::merge::MergeArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
