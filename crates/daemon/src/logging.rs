//! Logging setup
//!
//! Console output is pretty (development) or JSON (production). When a log
//! directory is configured, JSON lines are also written to a daily rolling
//! file.

use crate::config::{LogFormat, LogSettings};
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "joblist=info,tower_http=info";
const LOG_FILE_PREFIX: &str = "joblist-server.log";

/// Install the global subscriber. The returned guard flushes the file writer
/// on drop and must live until shutdown.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    match settings.format {
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .try_init()
            .context("Failed to install JSON subscriber")?,
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty())
            .try_init()
            .context("Failed to install pretty subscriber")?,
    }

    Ok(guard)
}
