use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::Config;

/// Install the global tracing subscriber.
///
/// Console output is enabled by `--verbose` or a `RUST_LOG` value. When
/// `log_to_file` is set, a daily rolling file is written as well; the
/// returned guard must be held until exit so buffered lines are flushed.
///
/// Fails when file logging was requested but the log directory cannot be
/// created, or when a global subscriber is already installed.
pub fn init_logging(verbose: bool, config: &Config) -> Result<Option<WorkerGuard>> {
    let console_filter = if verbose {
        Some(EnvFilter::new("recentsguard=debug"))
    } else {
        std::env::var("RUST_LOG").ok().map(EnvFilter::new)
    };

    let console = console_filter.map(|filter| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter)
    });

    let (file, guard) = if config.log_to_file {
        let logs_dir = Config::logs_dir();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;
        let appender = tracing_appender::rolling::daily(&logs_dir, "recentsguard.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(EnvFilter::new("recentsguard=info"));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    if console.is_some() || file.is_some() {
        tracing_subscriber::registry()
            .with(console)
            .with(file)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    Ok(guard)
}
