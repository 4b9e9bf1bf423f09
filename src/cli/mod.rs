//! Command-line definitions for both binaries.

pub mod runner;
pub mod service;

pub use runner::{ConfigArgs, RunArgs, RunnerCli, RunnerCommand};
pub use service::ServiceArgs;
