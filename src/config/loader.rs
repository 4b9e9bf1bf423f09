//! Configuration loading from disk and environment.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RunnerConfig, ServiceConfig};
use crate::config::validation::ValidationError;
use crate::error::ConfigWarning;

/// Keys read from the process environment by the command runner.
pub const RUNNER_ENV_KEYS: [&str; 3] = ["INPUT_PATH", "VERBOSE", "METRICS_ENABLED"];

/// Fatal configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the service configuration from an optional TOML file.
///
/// An unreadable file is a warning and yields the defaults; a file that
/// reads but does not parse is fatal. Validation runs later, after CLI
/// overrides have been applied.
pub fn load_service_config(
    path: Option<&Path>,
) -> Result<(ServiceConfig, Option<ConfigWarning>), ConfigError> {
    let Some(path) = path else {
        return Ok((ServiceConfig::default(), None));
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            let warning = ConfigWarning {
                path: path.to_path_buf(),
                source,
            };
            return Ok((ServiceConfig::default(), Some(warning)));
        }
    };

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok((config, None))
}

/// Parse the runner's `KEY=VALUE` format.
///
/// Leading whitespace is trimmed, `#` lines and blank lines are skipped,
/// lines without `=` are ignored. Values keep everything after the first
/// `=` up to the end of the line.
pub fn parse_key_values(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.trim_end_matches('\r').to_string()))
        .collect()
}

/// Build the runner configuration from environment pairs and an optional
/// file. The file wins over the environment; command-line flags are applied
/// on top by the caller.
pub fn load_runner_config<I, K, V>(
    env: I,
    file: Option<&Path>,
) -> (RunnerConfig, Option<ConfigWarning>)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<OsStr>,
{
    let mut config = RunnerConfig::default();
    for (key, value) in env {
        config.set(key.as_ref(), value);
    }

    let Some(path) = file else {
        return (config, None);
    };

    match fs::read_to_string(path) {
        Ok(content) => {
            for (key, value) in parse_key_values(&content) {
                config.set(&key, &value);
            }
            (config, None)
        }
        Err(source) => {
            let warning = ConfigWarning {
                path: path.to_path_buf(),
                source,
            };
            (config, Some(warning))
        }
    }
}

/// Snapshot the runner's recognized variables from the process environment.
pub fn runner_env() -> Vec<(String, OsString)> {
    RUNNER_ENV_KEYS
        .iter()
        .filter_map(|key| std::env::var_os(key).map(|value| (key.to_string(), value)))
        .collect()
}
