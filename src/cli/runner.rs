//! Command-line surface of `prodstarter-cli`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::RunnerConfig;

pub const APP_NAME: &str = "prodstarter-cli";

#[derive(Debug, Parser)]
#[command(name = APP_NAME)]
#[command(version, about = "Production-ready CLI template", long_about = None)]
pub struct RunnerCli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<RunnerCommand>,
}

#[derive(Debug, Subcommand)]
pub enum RunnerCommand {
    /// Show version
    Version,
    /// Run the main action
    Run(RunArgs),
    /// Print effective configuration (environment + optional file)
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// File to process line by line
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Collect run metrics and print them when done
    #[arg(long)]
    pub metrics: bool,

    /// KEY=VALUE config file, applied over the environment
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Apply flags on top of the environment and file layers.
    pub fn apply(&self, verbosity: u8, config: &mut RunnerConfig) {
        if let Some(input) = &self.input {
            config.input_path = Some(input.clone());
        }
        if self.metrics {
            config.metrics_enabled = true;
        }
        if verbosity > 0 {
            config.verbose = true;
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// KEY=VALUE config file
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}
