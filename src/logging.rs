// SPDX-License-Identifier: MIT
//
// Log setup.
//
// The terminal is in raw mode on the alternate screen, so nothing may be
// written to stdout or stderr while the picker runs. Everything goes to a
// file through a non-blocking writer; the returned guard flushes it on drop.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::LogLevel;

/// Environment variables checked for a filter, in order.
const FILTER_ENV_VARS: [&str; 2] = ["CHROMA_LOG", "RUST_LOG"];

/// Pick the filter directive: the first non-empty env var, else `level`.
fn filter_directive(level: LogLevel, lookup: impl Fn(&str) -> Option<String>) -> String {
    FILTER_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| level.as_filter_str().to_string())
}

/// Install the global subscriber writing to `path` (appended).
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init(path: &Path, level: LogLevel) -> Result<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let directive = filter_directive(level, |name| std::env::var(name).ok());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    let (writer, guard) = tracing_appender::non_blocking(file);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(guard)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn flag_used_without_env() {
        assert_eq!(filter_directive(LogLevel::Warn, env(&[])), "warn");
    }

    #[test]
    fn chroma_log_wins_over_rust_log() {
        let vars = [("RUST_LOG", "trace"), ("CHROMA_LOG", "chroma_core=debug")];
        assert_eq!(filter_directive(LogLevel::Info, env(&vars)), "chroma_core=debug");
    }

    #[test]
    fn rust_log_used_as_fallback() {
        let vars = [("RUST_LOG", "error")];
        assert_eq!(filter_directive(LogLevel::Info, env(&vars)), "error");
    }

    #[test]
    fn empty_env_is_ignored() {
        let vars = [("CHROMA_LOG", "  "), ("RUST_LOG", "")];
        assert_eq!(filter_directive(LogLevel::Debug, env(&vars)), "debug");
    }
}
