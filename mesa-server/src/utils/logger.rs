//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level. With a log directory the output
//! goes to a daily rolling file instead of stdout.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional JSON formatting and file output
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let target = log_target(log_dir);
    let file_appender = match target {
        LogTarget::File(path) => Some(tracing_appender::rolling::daily(path, "mesa-server")),
        LogTarget::Stdout | LogTarget::MissingDir(_) => None,
    };

    // try_init: tests and embedders may have installed a subscriber already
    let _ = match (file_appender, json) {
        (Some(appender), true) => builder
            .json()
            .with_ansi(false)
            .with_writer(appender)
            .try_init(),
        (Some(appender), false) => builder.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if let LogTarget::MissingDir(dir) = target {
        tracing::warn!(log_dir = dir, "Log directory does not exist, logging to stdout");
    }
}

/// Where log lines end up
#[derive(Debug, Clone, Copy, PartialEq)]
enum LogTarget<'a> {
    Stdout,
    File(&'a Path),
    /// A directory was configured but is not there; falls back to stdout
    MissingDir(&'a str),
}

fn log_target(log_dir: Option<&str>) -> LogTarget<'_> {
    match log_dir {
        None => LogTarget::Stdout,
        Some(dir) if Path::new(dir).is_dir() => LogTarget::File(Path::new(dir)),
        Some(dir) => LogTarget::MissingDir(dir),
    }
}

fn default_directives(level: &str) -> String {
    format!("mesa_server={level},shared={level},tower_http={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_workspace_crates() {
        let directives = default_directives("debug");
        assert!(directives.contains("mesa_server=debug"));
        assert!(directives.contains("tower_http=debug"));
        assert!(directives.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_log_target_falls_back_when_dir_missing() {
        assert_eq!(log_target(None), LogTarget::Stdout);

        let tmp = std::env::temp_dir();
        let existing = tmp.to_str().unwrap();
        assert_eq!(log_target(Some(existing)), LogTarget::File(Path::new(existing)));

        let missing = tmp.join(format!("mesa-logs-{}", uuid::Uuid::new_v4()));
        let missing = missing.to_str().unwrap();
        assert_eq!(log_target(Some(missing)), LogTarget::MissingDir(missing));
    }
}
