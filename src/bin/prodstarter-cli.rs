use std::process::ExitCode;
use std::sync::Arc;

use clap::CommandFactory;

use prodstarter::cli::runner::APP_NAME;
use prodstarter::cli::{ConfigArgs, RunArgs, RunnerCli, RunnerCommand};
use prodstarter::config::loader::runner_env;
use prodstarter::config::load_runner_config;
use prodstarter::error::{ExitStatus, RunError};
use prodstarter::lifecycle::signals::spawn_signal_listener;
use prodstarter::lifecycle::Shutdown;
use prodstarter::observability::{init_logging, level_for, metrics};
use prodstarter::runner::{render_config, CommandRunner};

#[tokio::main]
async fn main() -> ExitCode {
    let shutdown = Arc::new(Shutdown::new());
    let mut runner = CommandRunner::new(shutdown.clone());

    let cli = match runner.parse(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if !e.use_stderr() {
                return ExitStatus::Success.into();
            }
            return RunError::InvalidArguments(e.kind().to_string()).exit_status().into();
        }
    };

    match cli.command {
        None => {
            let _ = RunnerCli::command().print_help();
            ExitStatus::Success.into()
        }
        Some(RunnerCommand::Version) => {
            println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
            ExitStatus::Success.into()
        }
        Some(RunnerCommand::Config(args)) => show_config(&args, cli.verbose),
        Some(RunnerCommand::Run(args)) => run(runner, shutdown, &args, cli.verbose).await,
    }
}

fn show_config(args: &ConfigArgs, verbosity: u8) -> ExitCode {
    let (config, warning) = load_runner_config(runner_env(), args.file.as_deref());
    let _guard = init_logging(APP_NAME, level_for(verbosity, config.verbose));

    if let Some(warning) = warning {
        tracing::warn!(error = %warning, "Config file unavailable, showing environment and defaults");
    }

    match render_config(&config, args.json) {
        Ok(text) => {
            print!("{}", text);
            if args.json {
                println!();
            }
            ExitStatus::Success.into()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to render configuration");
            ExitStatus::RuntimeError.into()
        }
    }
}

async fn run(
    mut runner: CommandRunner,
    shutdown: Arc<Shutdown>,
    args: &RunArgs,
    verbosity: u8,
) -> ExitCode {
    let (config, warning) = runner.load_config(runner_env(), args, verbosity);
    let _guard = init_logging(APP_NAME, level_for(verbosity, config.verbose));

    if let Some(warning) = warning {
        tracing::warn!(error = %warning, "Config file unavailable, continuing with environment and defaults");
    }

    let recorder = if config.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };

    spawn_signal_listener(shutdown);

    let status = match runner.execute(&config).await {
        Ok(outcome) => outcome.exit_status(),
        Err(e) => {
            tracing::error!(error = %e, "run: failed");
            e.exit_status()
        }
    };

    if let Some(handle) = recorder {
        print!("{}", handle.render());
    }

    status.into()
}
