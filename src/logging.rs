//! Logging/tracing initialization

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry::LookupSpan, EnvFilter};

use crate::config::{LogFormat, LogTarget, LoggingConfig};

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` takes precedence over the configured level. The returned
/// guard flushes the file writer on drop and must be kept alive while
/// logging to a file. Fails if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.target {
        LogTarget::Console => {
            init_console_logging(subscriber, config.format)?;
            Ok(None)
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(config)?;
            init_file_logging(subscriber, config.format, writer)?;
            Ok(Some(guard))
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(config)?;
            init_both_logging(subscriber, config.format, writer)?;
            Ok(Some(guard))
        }
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;

    let file_appender = if config.daily_rotation {
        tracing_appender::rolling::daily(&config.log_dir, &config.log_prefix)
    } else {
        tracing_appender::rolling::never(&config.log_dir, &config.log_prefix)
    };

    Ok(tracing_appender::non_blocking(file_appender))
}

fn init_console_logging<S>(subscriber: S, format: LogFormat) -> Result<()>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    match format {
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Compact => subscriber
            .with(fmt::layer().compact().with_target(false))
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .try_init(),
    }
    .context("Failed to install console logger")
}

fn init_file_logging<S>(subscriber: S, format: LogFormat, writer: NonBlocking) -> Result<()>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    match format {
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .try_init(),
        LogFormat::Compact => subscriber
            .with(fmt::layer().compact().with_target(false).with_writer(writer))
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .try_init(),
    }
    .context("Failed to install file logger")
}

fn init_both_logging<S>(subscriber: S, format: LogFormat, writer: NonBlocking) -> Result<()>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    match format {
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_target(true))
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .try_init(),
        LogFormat::Compact => subscriber
            .with(fmt::layer().compact().with_target(false))
            .with(fmt::layer().compact().with_target(false).with_writer(writer))
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(fmt::layer().with_target(true))
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .try_init(),
    }
    .context("Failed to install logger")
}
