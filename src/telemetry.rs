//! Structured JSON traces of menu transitions and prompt deliveries.

use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::MakeWriter;

const TRACE_ENV: &str = "PROMPTDECK_TRACE_LOG";

static TRACING_INSTALLED: OnceLock<bool> = OnceLock::new();

/// Where trace events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceSink {
    Stderr,
    File(PathBuf),
}

/// Resolve the sink from the `PROMPTDECK_TRACE_LOG` value: `stderr` selects
/// standard error, any other non-empty value is a file path.
pub fn trace_sink(env_value: Option<&str>) -> TraceSink {
    match env_value.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("stderr") => TraceSink::Stderr,
        Some(value) if !value.is_empty() => TraceSink::File(PathBuf::from(value)),
        _ => TraceSink::File(env::temp_dir().join("promptdeck_trace.jsonl")),
    }
}

fn trace_level(config: &AppConfig) -> Level {
    if config.log_timings {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the JSON subscriber once. Returns the sink when tracing is active.
pub fn init_tracing(config: &AppConfig) -> Option<TraceSink> {
    if !config.logging_enabled() {
        return None;
    }
    let sink = trace_sink(env::var(TRACE_ENV).ok().as_deref());
    let level = trace_level(config);
    let installed = *TRACING_INSTALLED.get_or_init(|| match &sink {
        TraceSink::Stderr => install(io::stderr, level),
        TraceSink::File(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => install(Mutex::new(file), level),
            Err(_) => false,
        },
    });
    installed.then_some(sink)
}

fn install<W>(writer: W, level: Level) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_max_level(level)
        .with_target(false)
        .with_writer(writer)
        .with_current_span(false)
        .with_span_list(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn sink_follows_env_value() {
        assert_eq!(trace_sink(Some("stderr")), TraceSink::Stderr);
        assert_eq!(trace_sink(Some(" STDERR ")), TraceSink::Stderr);
        assert_eq!(
            trace_sink(Some("/tmp/deck.jsonl")),
            TraceSink::File(PathBuf::from("/tmp/deck.jsonl"))
        );
        assert_eq!(
            trace_sink(Some("")),
            TraceSink::File(env::temp_dir().join("promptdeck_trace.jsonl"))
        );
        assert_eq!(trace_sink(None), trace_sink(Some("")));
    }

    #[test]
    fn timings_flag_raises_detail() {
        let config = AppConfig::parse_from(["test-app", "--logs"]);
        assert_eq!(trace_level(&config), Level::INFO);
        let config = AppConfig::parse_from(["test-app", "--log-timings"]);
        assert_eq!(trace_level(&config), Level::DEBUG);
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let config = AppConfig::parse_from(["test-app", "--logs", "--no-logs"]);
        assert_eq!(init_tracing(&config), None);
    }
}
