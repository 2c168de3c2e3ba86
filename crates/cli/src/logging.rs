use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

use color_eyre::eyre::{Result, WrapErr, eyre};
use reggen_core::config::types::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Log to stderr, and append to `cfg.file` when one is configured.
///
/// `RUST_LOG` directives refine both outputs.
pub fn init(cfg: &LoggingConfig) -> Result<()> {
    let console_level = level_or(&cfg.level, LevelFilter::INFO);
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .with_filter(filter(console_level));

    let file = match &cfg.file {
        Some(path) => {
            let level = level_or(cfg.file_level.as_deref().unwrap_or(&cfg.level), LevelFilter::DEBUG);
            let (writer, guard) = tracing_appender::non_blocking(appender(path)?);
            // The guard flushes on drop; it lives until the process exits.
            let _ = FILE_GUARD.set(guard);

            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(filter(level)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("failed to install the log subscriber")
}

fn filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

/// An appending, never-rotated writer for `path`.
fn appender(path: &Path) -> Result<RollingFileAppender> {
    let name = path
        .file_name()
        .ok_or_else(|| eyre!("log file {} has no file name", path.display()))?;
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))
}

/// Parse a level name case-insensitively, falling back on unknown input.
fn level_or(name: &str, fallback: LevelFilter) -> LevelFilter {
    name.trim().parse().unwrap_or(fallback)
}
