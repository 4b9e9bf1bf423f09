//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for both binaries
//! - Render every event as
//!   `<timestamp with zone> <app-name> [<LEVEL>]: <message> <fields>`
//! - Map CLI verbosity to a level filter (RUST_LOG overrides)
//!
//! # Design Decisions
//! - Output goes to stderr through a non-blocking writer; the returned
//!   guard flushes it when dropped at process exit

use std::fmt::Write as _;

use chrono::{DateTime, Local, TimeZone};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Transport crates are noisy at debug; keep them at warn unless RUST_LOG
/// says otherwise.
const QUIET_DEPENDENCIES: &str = "h2=warn,hyper=warn,hyper_util=warn,tower=warn,rustls=warn";

/// Pick the level filter from the `-v` count and the `verbose` setting.
pub fn level_for(verbosity: u8, verbose: bool) -> LevelFilter {
    match verbosity {
        0 if verbose => LevelFilter::DEBUG,
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Line prefix: timestamp with zone offset, app name and bracketed level.
pub fn format_prefix<Tz>(timestamp: &DateTime<Tz>, app_name: &str, level: &Level) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut prefix = String::with_capacity(48);
    let _ = write!(
        prefix,
        "{} {} [{}]: ",
        timestamp.format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
        app_name,
        level
    );
    prefix
}

/// Event formatter producing the shared log line format.
#[derive(Debug, Clone, Copy)]
pub struct LineFormat {
    app_name: &'static str,
}

impl LineFormat {
    pub fn new(app_name: &'static str) -> Self {
        Self { app_name }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let prefix = format_prefix(&Local::now(), self.app_name, event.metadata().level());
        writer.write_str(&prefix)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber. Keep the guard alive until exit.
pub fn init_logging(app_name: &'static str, level: LevelFilter) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}", level, QUIET_DEPENDENCIES)));

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat::new(app_name))
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("{}: logging already initialized: {}", app_name, e);
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn prefix_matches_line_format() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let prefix = format_prefix(&ts, "prodstarter-cli", &Level::WARN);
        assert_eq!(prefix, "2024-03-09T14:05:07.000+02:00 prodstarter-cli [WARN]: ");
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0, false), LevelFilter::INFO);
        assert_eq!(level_for(0, true), LevelFilter::DEBUG);
        assert_eq!(level_for(1, false), LevelFilter::DEBUG);
        assert_eq!(level_for(3, false), LevelFilter::TRACE);
    }
}
